use alblog::datasource::reader::Reader;
use alblog::parser::{self, LineParser, TargetStatusPolicy};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const LINE: &str = r#"https 2017-12-13T12:00:00.257585Z app/myservice-prod-alb/111b8011115962e 22.222.111.11:14485 11.22.3.222:32777 0.001 0.010 0.000 200 200 407 698 "GET https://account.example.com:443/myservice/rpc/doSomething.action?userId=alslrizxcvkle1235&assetId=HJKHJK2134 HTTP/1.1" "Mozilla/5.0 (Windows NT 5.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/46.0.2490.80 Safari/537.36" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-1:111192911111:targetgroup/myservice-prod-green-service/bcf61d11d6111111 "Root=1-5a311111-21111a720161096a2222faff" "account.example.com" "arn:aws:acm:eu-west-1:917192913078:certificate/22d6d81e-1234-4321-3333-c1111f17599d""#;

fn parse_line_benchmark(c: &mut Criterion) {
    c.bench_function("parse line", |b| b.iter(|| parser::parse(black_box(LINE))));

    let strict = LineParser::new().target_status_policy(TargetStatusPolicy::PlaceholderOnly);
    c.bench_function("parse line strict", |b| b.iter(|| strict.parse(black_box(LINE))));

    c.bench_function("parse malformed line", |b| {
        b.iter(|| parser::parse(black_box("https 2017-12-13T12:00:00.257585Z truncated")))
    });
}

fn read_stream_benchmark(c: &mut Criterion) {
    let input: String = (0..1000).map(|_| format!("{}\n", LINE)).collect();

    c.bench_function("read 1000 lines", |b| {
        b.iter(|| {
            let mut rdr = Reader::from_reader(black_box(input.as_bytes()));
            rdr.for_each_entry(|entry| {
                black_box(entry);
            })
        })
    });
}

criterion_group!(benches, parse_line_benchmark, read_stream_benchmark);
criterion_main!(benches);
