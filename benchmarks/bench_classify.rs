use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use gcscope::preprocess::preprocess_all;
use gcscope::{
    analyze, AnalysisConfig, CanonicalLine, Classifier, CollectorFamily, GcLogParser,
    GcPreprocessor, ParserConfig, RawLine,
};

const LEGACY_LINES: &[&str] = &[
    "0.512: [GC (Allocation Failure) [PSYoungGen: 65536K->10720K(76288K)] 65536K->10728K(251392K), 0.0125340 secs] [Times: user=0.04 sys=0.01, real=0.01 secs]",
    "2.048: [Full GC (Ergonomics) [PSYoungGen: 10736K->0K(141824K)] [ParOldGen: 10344K->20561K(175104K)] 21080K->20561K(316928K), [Metaspace: 2800K->2800K(1056768K)], 0.0612000 secs] [Times: user=0.18 sys=0.00, real=0.06 secs]",
    "1.000: [GC (Allocation Failure) 1.000: [ParNew: 3712K->384K(4096K), 0.0100000 secs] 3712K->1200K(14336K), 0.0101000 secs] [Times: user=0.02 sys=0.00, real=0.01 secs]",
    "1.502: [CMS-concurrent-mark-start]",
    "1.305: [GC pause (mixed) 102M->24M(512M), 0.0254200 secs]",
    "1.000: Total time for which application threads were stopped: 0.0001215 seconds, Stopping threads took: 0.0000211 seconds",
];

const UNIFIED_LINES: &[&str] = &[
    "[0.060s][info][gc] GC(0) Pause Young (Normal) (G1 Evacuation Pause) 24M->5M(256M) 8.123ms User=0.01s Sys=0.00s Real=0.01s",
    "[0.520s][info][gc,marking] GC(2) Concurrent Mark From Roots 12.000ms",
    "[0.533s][info][gc] GC(2) Pause Remark 22M->22M(256M) 3.000ms",
    "[0.060s][info][gc,heap] GC(0) Eden regions: 24->0(20)",
];

/// A legacy CMS log with tenuring output and interleaved background phases
fn synthetic_cms_log(pauses: usize) -> String {
    let mut out = String::from(
        "CommandLine flags: -XX:+UseConcMarkSweepGC -XX:+PrintGCDetails -XX:+PrintTenuringDistribution\n",
    );
    for i in 0..pauses {
        let t = format!("{}.{:03}", i / 4, (i % 4) * 250);
        out.push_str(&format!("{t}: [GC (Allocation Failure) {t}: [ParNew\n"));
        if i % 3 == 0 {
            out.push_str(&format!("{t}: [CMS-concurrent-abortable-preclean-start]\n"));
        }
        out.push_str("Desired survivor size 1114112 bytes, new threshold 1 (max 15)\n");
        out.push_str("- age   1:    2228224 bytes,    2228224 total\n");
        out.push_str(": 3712K->384K(4096K), 0.0100000 secs] 3712K->1200K(14336K), 0.0101000 secs] [Times: user=0.02 sys=0.00, real=0.01 secs]\n");
    }
    out
}

fn bench_classify_legacy(c: &mut Criterion) {
    let lines: Vec<CanonicalLine> = LEGACY_LINES
        .iter()
        .enumerate()
        .map(|(i, l)| CanonicalLine::new(i + 1, *l))
        .collect();
    let mut classifier = Classifier::new().unwrap();
    c.bench_function("classify_legacy", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classifier.classify(black_box(line)).unwrap());
            }
        });
    });
}

fn bench_classify_unified(c: &mut Criterion) {
    let lines: Vec<CanonicalLine> = UNIFIED_LINES
        .iter()
        .enumerate()
        .map(|(i, l)| CanonicalLine::new(i + 1, *l))
        .collect();
    let mut classifier = Classifier::new().unwrap().with_family(CollectorFamily::G1);
    c.bench_function("classify_unified", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classifier.classify(black_box(line)).unwrap());
            }
        });
    });
}

fn bench_preprocess_cms(c: &mut Criterion) {
    let log = synthetic_cms_log(1_000);
    let mut group = c.benchmark_group("preprocess");
    group.throughput(Throughput::Bytes(log.len() as u64));
    group.bench_function("cms_1000_pauses", |b| {
        b.iter(|| {
            let raw = log
                .lines()
                .enumerate()
                .map(|(i, l)| RawLine::new(i + 1, l));
            black_box(preprocess_all(&mut GcPreprocessor::new(), raw));
        });
    });
    group.finish();
}

fn bench_parse_and_analyze(c: &mut Criterion) {
    let log = synthetic_cms_log(1_000);
    let mut group = c.benchmark_group("end_to_end");
    group.throughput(Throughput::Bytes(log.len() as u64));
    group.bench_function("cms_1000_pauses", |b| {
        b.iter(|| {
            let parsed = GcLogParser::parse_str(black_box(&log), ParserConfig::default()).unwrap();
            black_box(analyze(&parsed, &AnalysisConfig::default()));
        });
    });
    group.finish();
}

criterion_group!(
    classify_benches,
    bench_classify_legacy,
    bench_classify_unified,
    bench_preprocess_cms,
    bench_parse_and_analyze
);
criterion_main!(classify_benches);
