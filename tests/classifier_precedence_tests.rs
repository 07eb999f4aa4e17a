use gcscope::{CanonicalLine, Classifier, CollectorFamily, EventKind};

use CollectorFamily::{Cms, Parallel, Serial, Shenandoah, Unknown, Z, G1};

fn classify(line: &str, family: CollectorFamily) -> EventKind {
    let mut classifier = Classifier::new().unwrap().with_family(family);
    classifier
        .classify(&CanonicalLine::new(1, line))
        .unwrap()
        .event
        .kind
}

fn assert_corpus(corpus: &[(&str, CollectorFamily, EventKind)]) {
    let mut failures = Vec::new();
    for (line, family, expected) in corpus {
        let actual = classify(line, *family);
        if actual != *expected {
            failures.push(format!(
                "[{}] expected {}, got {}: {}",
                family, expected, actual, line
            ));
        }
    }
    assert!(failures.is_empty(), "misclassified:\n{}", failures.join("\n"));
}

#[test]
fn test_legacy_serial_and_parallel() {
    assert_corpus(&[
        (
            "1.000: [GC (Allocation Failure) 1.000: [DefNew: 17472K->2176K(19648K), 0.0123 secs] 17472K->5123K(63360K), 0.0124 secs] [Times: user=0.01 sys=0.00, real=0.01 secs]",
            Unknown,
            EventKind::SerialNew,
        ),
        (
            "1.000: [GC (Allocation Failure) 1.000: [DefNew: 17472K->17472K(19648K), 0.0000 secs]1.000: [Tenured: 40000K->30000K(43712K), 0.0500 secs] 57472K->30000K(63360K), [Metaspace: 2800K->2800K(1056768K)], 0.0501 secs]",
            Unknown,
            EventKind::SerialOld,
        ),
        (
            "0.512: [GC (Allocation Failure) [PSYoungGen: 65536K->10720K(76288K)] 65536K->10728K(251392K), 0.0125340 secs]",
            Unknown,
            EventKind::ParallelScavenge,
        ),
        (
            "2.048: [Full GC (Ergonomics) [PSYoungGen: 10736K->0K(141824K)] [ParOldGen: 10344K->20561K(175104K)] 21080K->20561K(316928K), [Metaspace: 2800K->2800K(1056768K)], 0.0612000 secs]",
            Unknown,
            EventKind::ParallelCompactingOld,
        ),
        (
            "2.048: [Full GC (Ergonomics) [PSYoungGen: 10736K->0K(141824K)] [PSOldGen: 10344K->20561K(175104K)] 21080K->20561K(316928K), [PSPermGen: 2800K->2800K(21504K)], 0.0612000 secs]",
            Unknown,
            EventKind::ParallelSerialOld,
        ),
        (
            "5.000: [Full GC (Ergonomics) [PSYoungGen: 100K->0K(1024K)] [ParOldGen: 3000K->3000K(3072K)] 3100K->3000K(4096K), [Metaspace: 2800K->2800K(1056768K)]      GC time would exceed GCTimeLimit of 98%, 1.0000000 secs]",
            Unknown,
            EventKind::ParallelCompactingOld,
        ),
    ]);
}

#[test]
fn test_legacy_cms() {
    assert_corpus(&[
        (
            "1.000: [GC (Allocation Failure) 1.000: [ParNew: 3712K->384K(4096K), 0.0100000 secs] 3712K->1200K(14336K), 0.0101000 secs]",
            Unknown,
            EventKind::ParNew,
        ),
        // The ParNew entry tolerates any note, so promotion failure must win first
        (
            "2.146: [GC (Allocation Failure) 2.146: [ParNew (promotion failed): 4096K->4096K(4096K), 0.0120000 secs] 12000K->8100K(14336K), 0.0130000 secs]",
            Unknown,
            EventKind::ParNewPromotionFailed,
        ),
        (
            "1.500: [GC (CMS Initial Mark) [1 CMS-initial-mark: 6000K(10240K)] 7000K(14336K), 0.0020000 secs]",
            Unknown,
            EventKind::CmsInitialMark,
        ),
        (
            "1.700: [GC (CMS Final Remark) [YG occupancy: 1000 K (4096 K)]1.700: [Rescan (parallel) , 0.0010000 secs]1.701: [weak refs processing, 0.0000100 secs] [1 CMS-remark: 6000K(10240K)] 7000K(14336K), 0.0020000 secs]",
            Unknown,
            EventKind::CmsRemark,
        ),
        (
            "5.000: [Full GC (System.gc()) 5.000: [CMS: 6000K->5000K(10240K), 0.0500000 secs] 7000K->5000K(14336K), [Metaspace: 2800K->2800K(1056768K)], 0.0510000 secs]",
            Unknown,
            EventKind::CmsSerialOld,
        ),
        ("1.502: [CMS-concurrent-mark-start]", Unknown, EventKind::CmsConcurrent),
        (
            "1.724: [CMS-concurrent-sweep: 0.010/0.020 secs] [Times: user=0.02 sys=0.00, real=0.02 secs]",
            Unknown,
            EventKind::CmsConcurrent,
        ),
    ]);
}

#[test]
fn test_legacy_g1() {
    assert_corpus(&[
        (
            "1.000: [GC pause (G1 Evacuation Pause) (young), 0.0100000 secs]   [Eden: 24.0M(24.0M)->0.0B(20.0M) Survivors: 0.0B->3072.0K Heap: 24.0M(256.0M)->5120.0K(256.0M)] [Times: user=0.02 sys=0.00, real=0.01 secs]",
            Unknown,
            EventKind::G1YoungPause,
        ),
        // Initial-mark and mixed before the young entries that accept any note
        (
            "1.200: [GC pause (G1 Humongous Allocation) (young) (initial-mark) 30M->20M(256M), 0.0060000 secs]",
            Unknown,
            EventKind::G1YoungInitialMark,
        ),
        (
            "1.305: [GC pause (mixed) 102M->24M(512M), 0.0254200 secs]",
            Unknown,
            EventKind::G1MixedPause,
        ),
        (
            "1.400: [GC pause (G1 Evacuation Pause) (young) (to-space exhausted) 250M->250M(256M), 0.0500000 secs]",
            Unknown,
            EventKind::G1YoungPause,
        ),
        (
            "1.500: [GC remark 1.500: [Finalize Marking, 0.0001000 secs] 1.500: [GC ref-proc, 0.0002000 secs] 1.501: [Unloading, 0.0010000 secs], 0.0030000 secs]",
            Unknown,
            EventKind::G1Remark,
        ),
        ("1.510: [GC cleanup 22M->22M(256M), 0.0005000 secs]", Unknown, EventKind::G1Cleanup),
        ("1.520: [GC concurrent-root-region-scan-start]", Unknown, EventKind::G1Concurrent),
        ("1.530: [GC concurrent-mark-end, 0.0120000 secs]", Unknown, EventKind::G1Concurrent),
        ("   [Parallel Time: 8.1 ms, GC Workers: 4]", Unknown, EventKind::G1Detail),
    ]);
}

#[test]
fn test_plain_full_gc_follows_family() {
    let line = "9.000: [Full GC (Allocation Failure)  250M->200M(256M), 0.8000000 secs]";
    assert_corpus(&[
        (line, G1, EventKind::G1FullGc),
        (line, Unknown, EventKind::ParallelCompactingOld),
        (line, Parallel, EventKind::ParallelCompactingOld),
        (line, Serial, EventKind::SerialOld),
        (line, Cms, EventKind::CmsSerialOld),
    ]);
}

#[test]
fn test_legacy_informational_lines() {
    assert_corpus(&[
        ("", Unknown, EventKind::Blank),
        ("Heap", Unknown, EventKind::HeapAtGc),
        (
            " par new generation   total 4608K, used 1000K [0x00000000f9a00000, 0x00000000f9f00000, 0x00000000fb000000)",
            Unknown,
            EventKind::HeapAtGc,
        ),
        (
            "Desired survivor size 1114112 bytes, new threshold 1 (max 15)",
            Unknown,
            EventKind::Tenuring,
        ),
        (
            "OpenJDK 64-Bit Server VM warning: ignoring option MaxPermSize=256m; support was removed in 8.0",
            Unknown,
            EventKind::VmWarning,
        ),
        (
            "1.000: Total time for which application threads were stopped: 0.0001215 seconds, Stopping threads took: 0.0000211 seconds",
            Unknown,
            EventKind::ApplicationStoppedTime,
        ),
        ("1.000: Application time: 0.5000000 seconds", Unknown, EventKind::ApplicationConcurrentTime),
        ("      GC time would exceed GCTimeLimit of 98%", Unknown, EventKind::GcOverheadLimit),
        ("this is not a gc line", Unknown, EventKind::Unknown),
    ]);
}

#[test]
fn test_unified_pauses_follow_family() {
    let full = "[1.000s][info][gc] GC(3) Pause Full (System.gc()) 20M->10M(64M) 30.000ms";
    let young = "[1.000s][info][gc] GC(4) Pause Young (Allocation Failure) 10M->2M(64M) 9.000ms";
    assert_corpus(&[
        (full, G1, EventKind::UnifiedG1FullGc),
        (full, Serial, EventKind::UnifiedOldPause),
        (full, Parallel, EventKind::UnifiedOldPause),
        (full, Shenandoah, EventKind::ShenandoahFullGc),
        (young, G1, EventKind::UnifiedG1YoungPause),
        (young, Parallel, EventKind::UnifiedYoungPause),
        (
            "[1.000s][info][gc] GC(5) Pause Young (Mixed) (G1 Evacuation Pause) 60M->30M(256M) 7.000ms",
            Unknown,
            EventKind::UnifiedG1MixedPause,
        ),
        (
            "[1.000s][info][gc] GC(6) Pause Young (Normal) (G1 Evacuation Pause) 24M->5M(256M) 8.123ms User=0.01s Sys=0.00s Real=0.01s",
            Unknown,
            EventKind::UnifiedG1YoungPause,
        ),
    ]);
}

#[test]
fn test_unified_concurrent_phases_follow_family() {
    let mark = "[1.000s][info][gc,phases] GC(2) Concurrent Mark 1.234ms";
    let init = "[1.000s][info][gc] GC(6) Pause Init Mark 0.500ms";
    assert_corpus(&[
        (mark, G1, EventKind::UnifiedG1Concurrent),
        (mark, Z, EventKind::ZConcurrent),
        (mark, Shenandoah, EventKind::ShenandoahConcurrent),
        (init, Shenandoah, EventKind::ShenandoahInitMark),
        (init, G1, EventKind::Unknown),
        (
            "[1.000s][info][gc] GC(7) Pause Mark Start 0.012ms",
            Z,
            EventKind::ZPause,
        ),
        (
            "[1.000s][info][gc] GC(7) Garbage Collection (Allocation Rate) 100M(10%)->60M(6%)",
            Z,
            EventKind::ZCollection,
        ),
    ]);
}

#[test]
fn test_unified_headers_and_safepoints() {
    assert_corpus(&[
        ("[0.004s][info][gc] Using G1", Unknown, EventKind::UsingCollector),
        ("[0.005s][info][gc,init] CPUs: 8 total, 8 available", Unknown, EventKind::HeaderCpus),
        ("[0.005s][info][gc,init] Heap Max Capacity: 256M", Unknown, EventKind::HeaderHeapCapacity),
        (
            "[1.000s][info][safepoint] Total time for which application threads were stopped: 0.0001215 seconds, Stopping threads took: 0.0000211 seconds",
            Unknown,
            EventKind::UnifiedSafepoint,
        ),
        (
            "[1.000s][info][safepoint] Safepoint \"G1CollectForAllocation\", Time since last: 1000 ns, Reaching safepoint: 200 ns, At safepoint: 3000 ns, Total: 3200 ns",
            Unknown,
            EventKind::UnifiedSafepoint,
        ),
        ("[0.060s][info][gc,heap] GC(0) Eden regions: 24->0(20)", G1, EventKind::UnifiedInfo),
        ("[0.005s][info][gc,init] Heap Region Size: 1M", G1, EventKind::UnifiedInfo),
        (
            "[0.052s][info][gc,start] GC(0) Pause Young (Normal) (G1 Evacuation Pause)",
            G1,
            EventKind::UnifiedInfo,
        ),
        ("[1.000s][info][safepoint] Application time: 0.5000000 seconds", G1, EventKind::UnifiedInfo),
        ("[2.000s][info][gc,heap,exit] Heap", G1, EventKind::UnifiedInfo),
        (
            "[2.000s][info][gc,heap,exit]  garbage-first heap   total 262144K, used 2048K [0x00000000f0000000, 0x0000000100000000)",
            G1,
            EventKind::UnifiedInfo,
        ),
        (
            "[0.468s][info][gc] Trigger: Learning 1 of 5. Free (31M) is below initial threshold (44M)",
            Shenandoah,
            EventKind::UnifiedInfo,
        ),
        ("[0.468s][info][gc] Trigger: Learning 1 of 5", G1, EventKind::Unknown),
        ("[0.070s][info][gc] GC(1) Pause Remark garbled text here", G1, EventKind::Unknown),
    ]);
}

#[test]
fn test_unified_cms() {
    let young = "[1.010s][info][gc] GC(0) Pause Young (Allocation Failure) 9M->6M(14M) 10.123ms";
    let mark = "[1.600s][info][gc] GC(1) Concurrent Mark 98.000ms";
    assert_corpus(&[
        ("[0.010s][info][gc] Using Concurrent Mark Sweep", Unknown, EventKind::UsingCollector),
        (young, Cms, EventKind::UnifiedParNew),
        (young, Parallel, EventKind::UnifiedYoungPause),
        (
            "[1.010s][info][gc] GC(0) Pause Young (Allocation Failure) 9M->6M(14M) 10.123ms [ParNew: 3712K->384K(4096K)] [CMS: 6000K->6500K(10240K)] [Metaspace: 2800K->2800K(1056768K)] User=0.02s Sys=0.00s Real=0.01s",
            Cms,
            EventKind::UnifiedParNew,
        ),
        (
            "[1.502s][info][gc] GC(1) Pause Initial Mark 7M->7M(14M) 2.000ms",
            Cms,
            EventKind::UnifiedCmsInitialMark,
        ),
        (
            "[1.703s][info][gc] GC(1) Pause Remark 8M->8M(14M) 3.000ms",
            Cms,
            EventKind::UnifiedCmsRemark,
        ),
        (mark, Cms, EventKind::UnifiedCmsConcurrent),
        (mark, G1, EventKind::UnifiedG1Concurrent),
        ("[1.502s][info][gc] GC(1) Concurrent Mark", Cms, EventKind::UnifiedCmsConcurrent),
        (
            "[1.700s][info][gc] GC(1) Concurrent Abortable Preclean 99.000ms",
            Cms,
            EventKind::UnifiedCmsConcurrent,
        ),
        ("[1.721s][info][gc] GC(1) Concurrent Reset 1.000ms", Cms, EventKind::UnifiedCmsConcurrent),
        (
            "[3.000s][info][gc] GC(2) Pause Full (Allocation Failure) 13M->5M(14M) 40.000ms",
            Cms,
            EventKind::UnifiedOldPause,
        ),
    ]);
}

#[test]
fn test_unified_generation_summaries() {
    assert_corpus(&[
        (
            "[0.524s][info][gc] GC(0) Pause Young (Allocation Failure) 64M->10M(245M) 12.534ms [PSYoungGen: 65536K->10720K(76288K)] [ParOldGen: 0K->8K(175104K)] [Metaspace: 2800K->2800K(1056768K)] User=0.04s Sys=0.01s Real=0.01s",
            Parallel,
            EventKind::UnifiedYoungPause,
        ),
        (
            "[0.260s][info][gc] GC(1) Pause Full (System.gc()) 12M->3M(64M) 55.000ms [DefNew: 4096K->0K(9216K)] [Tenured: 8192K->3072K(20480K)]",
            Serial,
            EventKind::UnifiedOldPause,
        ),
        // Outside a pause, with no gc,start line to anchor it
        ("[0.524s][info][gc,heap] GC(0) PSYoungGen: 65536K->10720K(76288K)", Parallel, EventKind::UnifiedGeneration),
        ("[0.524s] GC(0) ParOldGen: 0K->8K(175104K)", Parallel, EventKind::UnifiedGeneration),
    ]);
}

#[test]
fn test_diagnostic_output_around_pauses() {
    assert_corpus(&[
        (
            "0.400: [G1Ergonomics (Concurrent Cycles) request concurrent cycle initiation, reason: occupancy higher than threshold, occupancy: 100663296 bytes, allocation request: 0 bytes, threshold: 96636750 bytes (45.00 %), source: end of GC]",
            G1,
            EventKind::AdaptiveSizePolicy,
        ),
        (
            " 0.309: [G1Ergonomics (CSet Construction) add young regions to CSet, eden: 24 regions, survivors: 0 regions, predicted young region time: 100.00 ms]",
            G1,
            EventKind::AdaptiveSizePolicy,
        ),
        ("AdaptiveSizeStart: 2.060 collection: 3 ", Parallel, EventKind::AdaptiveSizePolicy),
        (
            "PSAdaptiveSizePolicy::compute_eden_space_size: costs minor_time: 0.012 major_cost: 0.000 mutator_cost: 0.988 throughput_goal: 0.990",
            Parallel,
            EventKind::AdaptiveSizePolicy,
        ),
        ("  avg_survived_padded_avg: 10720.0  avg_promoted_padded_avg: 8.0", Parallel, EventKind::AdaptiveSizePolicy),
        (
            "Full thread dump OpenJDK 64-Bit Server VM (25.131-b11 mixed mode):",
            Unknown,
            EventKind::ThreadDump,
        ),
        (
            "\"main\" #1 prio=5 os_prio=0 tid=0x00007f3c3c00a000 nid=0x1a03 waiting on condition [0x00007f3c44a5c000]",
            Unknown,
            EventKind::ThreadDump,
        ),
        ("   java.lang.Thread.State: TIMED_WAITING (sleeping)", Unknown, EventKind::ThreadDump),
        ("\tat java.lang.Thread.sleep(Native Method)", Unknown, EventKind::ThreadDump),
        ("\t- locked <0x000000076b2a1e48> (a java.lang.Object)", Unknown, EventKind::ThreadDump),
        ("JNI global references: 5", Unknown, EventKind::ThreadDump),
    ]);
}

#[test]
fn test_dialect_keeps_legacy_text_out_of_unified_entries() {
    // Unified decorator, legacy body
    assert_eq!(
        classify("[1.000s][info][gc] [GC pause (mixed) 102M->24M(512M), 0.0254200 secs]", G1),
        EventKind::Unknown
    );
    // Legacy decorator, unified body
    assert_eq!(
        classify("1.000: GC(3) Pause Full (System.gc()) 20M->10M(64M) 30.000ms", G1),
        EventKind::Unknown
    );
}
