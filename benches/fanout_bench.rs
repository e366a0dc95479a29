use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dnscheck::check::Checker;
use dnscheck::dns::{Answering, Lookup, ResolverEndpoint};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Answers immediately, so only the fan-out/fan-in machinery is measured.
struct ReadyLookup;

impl Lookup for ReadyLookup {
    fn lookup(&self, _domain: &str, _server: &str) -> Answering {
        Box::pin(std::future::ready(Ok(vec![Ipv4Addr::new(93, 184, 216, 34)])))
    }
}

fn endpoints(n: usize) -> Vec<ResolverEndpoint> {
    (0..n)
        .map(|i| ResolverEndpoint::new(format!("resolver-{i}"), format!("10.0.{}.{}", i / 256, i % 256)))
        .collect()
}

fn bench_check_all(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let checker = Checker::new(Arc::new(ReadyLookup));

    let mut group = c.benchmark_group("check_all");
    for n in [1usize, 16, 128, 1024] {
        let list = endpoints(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &list, |b, list| {
            b.to_async(&rt)
                .iter(|| async { black_box(checker.check_all("example.com", list).await) });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_check_all);
criterion_main!(benches);
