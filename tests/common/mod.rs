// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use gcscope::{EventKind, GcLogParser, ParsedLog, ParserConfig};
use std::io::Write;
use tempfile::NamedTempFile;

/// Parse a whole log with the default configuration
pub fn parse(input: &str) -> ParsedLog {
    parse_with(input, ParserConfig::default())
}

pub fn parse_with(input: &str, config: ParserConfig) -> ParsedLog {
    GcLogParser::parse_str(input, config).expect("registry compiles")
}

/// Event kinds in stream order
pub fn kinds(log: &ParsedLog) -> Vec<EventKind> {
    log.events.iter().map(|e| e.kind).collect()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// JDK 8 Parallel collector run with -XX:+PrintGCDetails
pub const PARALLEL_LOG: &str = "\
Java HotSpot(TM) 64-Bit Server VM (25.131-b11) for linux-amd64 JRE (1.8.0_131-b11), built on Mar 15 2017 01:23:40 by \"java_re\" with gcc 4.3.0 20080428 (Red Hat 4.3.0-8)
Memory: 4k page, physical 16333764k(1427956k free), swap 2097148k(2097148k free)
CommandLine flags: -XX:InitialHeapSize=261340224 -XX:MaxHeapSize=4181443584 -XX:+PrintGC -XX:+PrintGCDetails -XX:+PrintGCTimeStamps -XX:+UseParallelGC
0.512: [GC (Allocation Failure) [PSYoungGen: 65536K->10720K(76288K)] 65536K->10728K(251392K), 0.0125340 secs] [Times: user=0.04 sys=0.01, real=0.01 secs]
1.024: [GC (Allocation Failure) [PSYoungGen: 76256K->10736K(141824K)] 76264K->21080K(316928K), 0.0180210 secs] [Times: user=0.06 sys=0.01, real=0.02 secs]
2.048: [Full GC (System.gc()) [PSYoungGen: 10736K->0K(141824K)] [ParOldGen: 10344K->20561K(175104K)] 21080K->20561K(316928K), [Metaspace: 2800K->2800K(1056768K)], 0.0612000 secs] [Times: user=0.18 sys=0.00, real=0.06 secs]
3.000: [GC (Allocation Failure) [PSYoungGen: 131072K->12000K(141824K)] 151633K->32561K(316928K), 0.0150000 secs] [Times: user=0.05 sys=0.00, real=0.02 secs]
Heap
 PSYoungGen      total 141824K, used 60000K [0x000000076ab00000, 0x0000000774b00000, 0x00000007c0000000)
";

/// JDK 8 CMS run, including a concurrent mode failure interleaved with a
/// background phase report
pub const CMS_LOG: &str = "\
CommandLine flags: -XX:MaxHeapSize=14680064 -XX:+PrintGC -XX:+PrintGCDetails -XX:+PrintGCTimeStamps -XX:+UseConcMarkSweepGC -XX:+UseParNewGC
1.000: [GC (Allocation Failure) 1.000: [ParNew: 3712K->384K(4096K), 0.0100000 secs] 3712K->1200K(14336K), 0.0101000 secs] [Times: user=0.02 sys=0.00, real=0.01 secs]
1.500: [GC (CMS Initial Mark) [1 CMS-initial-mark: 6000K(10240K)] 7000K(14336K), 0.0020000 secs] [Times: user=0.00 sys=0.00, real=0.00 secs]
1.502: [CMS-concurrent-mark-start]
2.146: [GC (Allocation Failure) 2.146: [ParNew (promotion failed): 4096K->4096K(4096K), 0.0120000 secs]2.176: [CMS2.225: [CMS-concurrent-mark: 0.068/0.222 secs] [Times: user=0.44 sys=0.02, real=0.22 secs]
 (concurrent mode failure): 8000K->8100K(10240K), 0.0700000 secs] 12000K->8100K(14336K), [Metaspace: 2800K->2800K(1056768K)], 0.0830000 secs] [Times: user=0.08 sys=0.00, real=0.08 secs]
3.000: [GC (Allocation Failure) 3.000: [ParNew: 3712K->384K(4096K), 0.0090000 secs] 11812K->8500K(14336K), 0.0091000 secs] [Times: user=0.02 sys=0.00, real=0.01 secs]
";

/// JDK 11 G1 run with unified logging at info level
pub const UNIFIED_G1_LOG: &str = "\
[0.004s][info][gc] Using G1
[0.005s][info][gc,init] Version: 11.0.2+9 (release)
[0.005s][info][gc,init] CPUs: 8 total, 8 available
[0.005s][info][gc,init] Memory: 16G
[0.005s][info][gc,init] Heap Max Capacity: 256M
[0.052s][info][gc,start    ] GC(0) Pause Young (Normal) (G1 Evacuation Pause)
[0.052s][info][gc,task     ] GC(0) Using 2 workers of 4 for evacuation
[0.060s][info][gc,heap     ] GC(0) Eden regions: 24->0(20)
[0.060s][info][gc          ] GC(0) Pause Young (Normal) (G1 Evacuation Pause) 24M->5M(256M) 8.123ms
[0.060s][info][gc,cpu      ] GC(0) User=0.01s Sys=0.00s Real=0.01s
[0.500s][info][gc,start    ] GC(1) Pause Young (Concurrent Start) (G1 Humongous Allocation)
[0.506s][info][gc          ] GC(1) Pause Young (Concurrent Start) (G1 Humongous Allocation) 40M->20M(256M) 6.000ms
[0.506s][info][gc,cpu      ] GC(1) User=0.01s Sys=0.00s Real=0.01s
[0.506s][info][gc          ] GC(2) Concurrent Cycle
[0.520s][info][gc,marking  ] GC(2) Concurrent Mark From Roots 12.000ms
[0.530s][info][gc,start    ] GC(2) Pause Remark
[0.533s][info][gc          ] GC(2) Pause Remark 22M->22M(256M) 3.000ms
[0.533s][info][gc,cpu      ] GC(2) User=0.00s Sys=0.00s Real=0.00s
[0.540s][info][gc,start    ] GC(2) Pause Cleanup
[0.541s][info][gc          ] GC(2) Pause Cleanup 22M->22M(256M) 0.500ms
[0.541s][info][gc,cpu      ] GC(2) User=0.00s Sys=0.00s Real=0.00s
[0.545s][info][gc          ] GC(2) Concurrent Cycle 39.000ms
";
