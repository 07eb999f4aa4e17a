//! The ordered definition table and its template language.
//!
//! Templates are regular expressions with placeholders for the shared
//! sub-patterns:
//!
//! | placeholder   | expands to                                              |
//! |---------------|---------------------------------------------------------|
//! | `{ts}`        | optional embedded `<datestamp>: <uptime>: `             |
//! | `{cause}`     | optional ` (<cause>)`, captured as `trigger`            |
//! | `{size}`      | an uncaptured size                                      |
//! | `{mem:p}`     | `p_before->p_after(p_capacity)`                         |
//! | `{tr:p}`      | `p_before->p_after`, ZGC percentages tolerated          |
//! | `{occ:p}`     | `p_after(p_capacity)`                                   |
//! | `{g1mem:p}`   | G1 `p_before(cap)->p_after(p_capacity)`                 |
//! | `{g1sum}`     | G1 `[Eden: ... Heap: ...]` summary with young and heap  |
//! | `{meta}`      | optional `, [Metaspace: ...]` or perm gen triple        |
//! | `{gens}`      | optional unified `[PSYoungGen: ...]`-style blocks       |
//! | `{secs}`      | `duration` in seconds                                   |
//! | `{dur}`       | an uncaptured inner `secs` duration                     |
//! | `{ms}`/`{ns}` | `duration` in milliseconds / nanoseconds                |
//! | `{concurrent}`| CMS `cpu/wall secs`                                     |
//! | `{times}`     | optional `[Times: user= sys=, real= secs]`              |
//! | `{cpu}`       | optional unified ` User=s Sys=s Real=s`                 |
//! | `{gcid}`      | unified `GC(n)`                                         |
//! | `{overhead}`  | optional `GC time would exceed GCTimeLimit` note        |
//!
//! Order matters: more specific definitions come before the general ones
//! that would also match their text. The registry tests pin each such pair.

use super::{Area, Definition, Dialect, Field, HeaderField as H};
use crate::decorator::{DATESTAMP, UPTIME};
use crate::kind::{CollectorFamily as F, EventKind as K};
use crate::measurement::DurationUnit;
use once_cell::sync::Lazy;
use regex::Regex;
use Dialect::{Any, Legacy, Unified};

const SIZE: &str = r"\d+(?:[.,]\d+)?[BKMGbkmg]B?";
const DECIMAL: &str = r"\d+[.,]\d+";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?P<name>[a-z][a-z0-9]*)(?::(?P<arg>[a-z]+))?\}")
        .expect("placeholder pattern is valid")
});

/// Expand every placeholder in `template`
pub(crate) fn expand(template: &str) -> Result<String, String> {
    let mut out = String::with_capacity(template.len() * 2);
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        out.push_str(&placeholder(&caps["name"], caps.name("arg").map(|m| m.as_str()))?);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

fn placeholder(name: &str, arg: Option<&str>) -> Result<String, String> {
    let area = |arg: &str| {
        Area::from_prefix(arg).ok_or_else(|| format!("unknown memory area '{}' in '{{{}}}'", arg, name))
    };
    let expanded = match (name, arg) {
        ("ts", None) => format!(r"(?:{}: )?(?:{}: )?", DATESTAMP, UPTIME),
        ("cause", None) => r"(?: \((?P<trigger>(?:[^()]|\(\))+)\))?".to_string(),
        ("size", None) => SIZE.to_string(),
        ("secs", None) => format!(r"(?P<duration>{}) (?:secs|seconds|sec)", DECIMAL),
        ("dur", None) => format!(r"{} secs", DECIMAL),
        ("ms", None) => r"(?P<duration>\d+(?:[.,]\d+)?) ?ms".to_string(),
        ("ns", None) => r"(?P<duration>\d+) ?ns".to_string(),
        ("concurrent", None) => format!(r"(?P<cpu>{d})/(?P<wall>{d}) secs", d = DECIMAL),
        ("times", None) => format!(
            r"(?:\s*\[Times: user=(?P<times_user>{d}) sys=(?P<times_sys>{d}), real=(?P<times_real>{d}) secs\])?",
            d = DECIMAL
        ),
        ("cpu", None) => format!(
            r"(?: User=(?P<times_user>{d})s Sys=(?P<times_sys>{d})s Real=(?P<times_real>{d})s)?",
            d = DECIMAL
        ),
        ("gcid", None) => r"GC\(\d+\)".to_string(),
        ("overhead", None) => {
            r"(?:\s*GC time (?:would exceed|is exceeding) GCTimeLimit of \d+%)?".to_string()
        }
        ("meta", None) => format!(
            r"(?:,? \[(?:Metaspace|Perm ?|PSPermGen|CMS Perm ?): {}\])?",
            memory(Area::Metaspace)
        ),
        ("gens", None) => format!(
            r"(?: \[(?:PSYoungGen|DefNew|ParNew): {}\])?(?: \[(?:ParOldGen|PSOldGen|Tenured|CMS): {}\])?(?: \[Metaspace: {}\])?",
            memory(Area::Young),
            memory(Area::Old),
            memory(Area::Metaspace)
        ),
        ("g1sum", None) => format!(
            r"\[Eden: {} Survivors: {s}->{s} Heap: {}\](?:, \[Metaspace: {}\])?",
            g1_memory(Area::Young),
            g1_memory(Area::Heap),
            memory(Area::Metaspace),
            s = SIZE
        ),
        ("mem", Some(arg)) => memory(area(arg)?),
        ("tr", Some(arg)) => {
            let [before, after, _] = area(arg)?.groups();
            format!(
                r"(?P<{}>{s})(?:\(\d+%\))?->(?P<{}>{s})(?:\(\d+%\))?",
                before,
                after,
                s = SIZE
            )
        }
        ("occ", Some(arg)) => {
            let [_, after, capacity] = area(arg)?.groups();
            format!(r"(?P<{}>{s}) ?\((?P<{}>{s})\)", after, capacity, s = SIZE)
        }
        ("g1mem", Some(arg)) => g1_memory(area(arg)?),
        _ => return Err(format!("unknown placeholder '{{{}}}'", name)),
    };
    Ok(expanded)
}

fn memory(area: Area) -> String {
    let [before, after, capacity] = area.groups();
    format!(
        r"(?P<{}>{s})->(?P<{}>{s})\((?P<{}>{s})\)",
        before,
        after,
        capacity,
        s = SIZE
    )
}

fn g1_memory(area: Area) -> String {
    let [before, after, capacity] = area.groups();
    format!(
        r"(?P<{}>{s})\({s}\)->(?P<{}>{s})\((?P<{}>{s})\)",
        before,
        after,
        capacity,
        s = SIZE
    )
}

const SECS: Field = Field::Duration(DurationUnit::Seconds);
const MS: Field = Field::Duration(DurationUnit::Millis);
const NS: Field = Field::Duration(DurationUnit::Nanos);
const HEAP: Field = Field::Memory(Area::Heap);
const YOUNG: Field = Field::Memory(Area::Young);
const OLD: Field = Field::Memory(Area::Old);
const META: Field = Field::Memory(Area::Metaspace);

/// Cause and `[Times]` are optional on every pause
const EXTRAS: &[Field] = &[Field::Trigger, Field::Times];
const EXTRAS_META: &[Field] = &[Field::Trigger, Field::Times, META];
/// Unified pauses of the generational collectors may carry `{gens}`
const UNIFIED_EXTRAS: &[Field] = &[Field::Trigger, Field::Times, YOUNG, OLD, META];

/// Unified tags that only ever carry breakdowns of what a summary line
/// already reports, or start-of-event notices
const DETAIL_TAGS: &[&str] = &[
    "start", "cpu", "init", "heap", "phases", "metaspace", "task", "age", "ergo", "ihop",
    "ref", "marking", "stats", "exit", "stringdedup", "stringtable", "humongous", "remset",
    "reloc", "alloc", "load", "nmethod", "director", "plab", "tlab", "freelist", "region",
    "promotion", "mmu", "compaction", "periodic", "cds", "verify", "classhisto",
];

/// Young-collection text the legacy `-XX:+PrintGC` format shares across
/// Serial, Parallel, and CMS
const SIMPLE_YOUNG: &str = r"\[GC(?:--)?{cause}\s+{mem:heap}, {secs}\]{times}";
const SIMPLE_FULL: &str = r"\[Full GC{cause}\s+{mem:heap}{overhead}, {secs}\]{times}";

pub static DEFINITIONS: &[Definition] = &[
    Definition::new("blank", K::Blank, Any, r"\s*"),
    //
    // Legacy headers and informational lines
    //
    Definition::new(
        "header_version",
        K::HeaderVersion,
        Legacy,
        r"(?:Java HotSpot\(TM\)|OpenJDK) (?P<bits>64|32)-Bit (?:Server|Client) VM \([^)]*\) for (?P<os>\S+) JRE \((?P<jre>[^)]*)\).*",
    )
    .requires(&[Field::Header(H::Version)]),
    Definition::new(
        "header_memory",
        K::HeaderMemory,
        Legacy,
        r"Memory: \d+k page, physical (?P<physical_total>{size})\((?P<physical_free>{size}) free\), swap (?P<swap_total>{size})\((?P<swap_free>{size}) free\)",
    )
    .requires(&[Field::Header(H::Memory)]),
    Definition::new(
        "header_command_line_flags",
        K::HeaderCommandLineFlags,
        Legacy,
        r"CommandLine flags: (?P<flags>.*)",
    )
    .requires(&[Field::Header(H::Flags)]),
    Definition::new(
        "vm_warning",
        K::VmWarning,
        Legacy,
        r"(?:Java HotSpot\(TM\)|OpenJDK) (?:64|32)-Bit (?:Server|Client) VM warning: .*",
    ),
    Definition::new(
        "log_rotation",
        K::LogRotation,
        Legacy,
        r"(?:\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} )?GC log file (?:created|has reached the maximum size).*",
    ),
    Definition::new(
        "tenuring",
        K::Tenuring,
        Legacy,
        r"Desired survivor size \d+ bytes, new threshold \d+ \(max(?: threshold)? \d+\)|- age +\d+: +\d+ bytes, +\d+ total",
    ),
    Definition::new(
        "heap_at_gc",
        K::HeapAtGc,
        Legacy,
        r"\{Heap (?:before|after) GC invocations=\d+ \(full \d+\):|\}|Heap|\s+(?:par new generation|def new generation|PSYoungGen|ParOldGen|PSOldGen|PSPermGen|tenured generation|concurrent mark-sweep generation|concurrent-mark-sweep perm gen|compacting perm gen|garbage-first heap|Metaspace|class space|eden space|from space|to space|object space|the space|region size|ro space|rw space)\b.*",
    ),
    Definition::new(
        "class_unloading",
        K::ClassUnloading,
        Legacy,
        r"\[(?:Unloading|Loading|Loaded) class .*",
    ),
    Definition::new(
        "application_concurrent_time",
        K::ApplicationConcurrentTime,
        Legacy,
        r"Application time: \d+[.,]\d+ seconds",
    ),
    Definition::new(
        "application_stopped_time",
        K::ApplicationStoppedTime,
        Legacy,
        r"Total time for which application threads were stopped: {secs}(?:, Stopping threads took: \d+[.,]\d+ seconds)?",
    )
    .requires(&[SECS]),
    Definition::new(
        "gc_overhead_limit",
        K::GcOverheadLimit,
        Legacy,
        r"\s*GC time (?:would exceed|is exceeding) GCTimeLimit of \d+%",
    ),
    Definition::new(
        "adaptive_size_policy",
        K::AdaptiveSizePolicy,
        Legacy,
        r"\s*(?:{ts}\[G1Ergonomics \([^)]*\) .*\]|(?:PS)?AdaptiveSize\w*(?:::\w+)?:.*|avg_\w+: .*)",
    ),
    Definition::new(
        "thread_dump",
        K::ThreadDump,
        Legacy,
        r#"Full thread dump .*|"[^"]*" .*\b(?:tid|nid)=0x[0-9a-f]+.*|\s+java\.lang\.Thread\.State: .*|\s+at [\w$.<>/-]+\(.*\)|\s+- (?:locked|waiting on|waiting to lock|parking to wait for|eliminated) .*|\s+- None|\s+Locked ownable synchronizers:|JNI global (?:references|refs): .*|Found (?:one|\d+) Java-level deadlocks?:|Java stack information for the threads listed above:|Threads class SMR info:|_java_thread_list=0x[0-9a-f]+, length=\d+, elements=\{|\s*0x[0-9a-f]+(?:, 0x[0-9a-f]+)*,?|=+"#,
    ),
    //
    // Serial
    //
    Definition::new(
        "serial_new",
        K::SerialNew,
        Legacy,
        r"\[GC{cause} {ts}\[DefNew: {mem:young}, {dur}\] {mem:heap}{meta}, {secs}\]{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "serial_old",
        K::SerialOld,
        Legacy,
        r"\[(?:Full GC|GC){cause} {ts}(?:\[DefNew: [^\]]*\]\s*{ts})?\[Tenured: {mem:old}, {dur}\] {mem:heap}{meta}, {secs}\]{times}",
    )
    .requires(&[OLD, HEAP, SECS])
    .optional(EXTRAS_META),
    //
    // Parallel
    //
    Definition::new(
        "parallel_scavenge",
        K::ParallelScavenge,
        Legacy,
        r"\[GC(?:--)?{cause} {ts}\[PSYoungGen: {mem:young}\] {mem:heap}, {secs}\]{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(EXTRAS),
    Definition::new(
        "parallel_compacting_old",
        K::ParallelCompactingOld,
        Legacy,
        r"\[Full GC{cause} {ts}\[PSYoungGen: {mem:young}\] \[ParOldGen: {mem:old}\] {mem:heap}{meta}{overhead}, {secs}\]{times}",
    )
    .requires(&[YOUNG, OLD, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "parallel_serial_old",
        K::ParallelSerialOld,
        Legacy,
        r"\[Full GC{cause} {ts}\[PSYoungGen: {mem:young}\] \[PSOldGen: {mem:old}\] {mem:heap}{meta}{overhead}, {secs}\]{times}",
    )
    .requires(&[YOUNG, OLD, HEAP, SECS])
    .optional(EXTRAS_META),
    //
    // CMS. Promotion failure first: the plain ParNew entry tolerates any
    // parenthesized ParNew note and would otherwise claim it.
    //
    Definition::new(
        "par_new_promotion_failed",
        K::ParNewPromotionFailed,
        Legacy,
        r"\[GC{cause} {ts}\[ParNew \(promotion failed\): {mem:young}, {dur}\]\s*(?:{ts}\[CMS(?: \((?:concurrent mode failure|concurrent mode interrupted)\))?: {mem:old}, {dur}\] )?{mem:heap}{meta}, {secs}\]{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(&[OLD, Field::Trigger, Field::Times, META]),
    Definition::new(
        "par_new",
        K::ParNew,
        Legacy,
        r"\[GC{cause} {ts}\[ParNew(?: \([^)]*\))?: {mem:young}, {dur}\] {mem:heap}{meta}, {secs}\]{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "cms_initial_mark",
        K::CmsInitialMark,
        Legacy,
        r"\[GC{cause} ?\[1 CMS-initial-mark: {occ:old}\] {occ:heap}, {secs}\]{times}",
    )
    .requires(&[Field::Occupancy(Area::Old), Field::Occupancy(Area::Heap), SECS])
    .optional(EXTRAS),
    Definition::new(
        "cms_remark",
        K::CmsRemark,
        Legacy,
        r"\[GC{cause} ?\[YG occupancy: .*\[1 CMS-remark: {occ:old}\] {occ:heap}, {secs}\]{times}",
    )
    .requires(&[Field::Occupancy(Area::Old), Field::Occupancy(Area::Heap), SECS])
    .optional(EXTRAS),
    Definition::new(
        "cms_serial_old",
        K::CmsSerialOld,
        Legacy,
        r"\[(?:Full GC|GC){cause} {ts}\[CMS(?: \((?:concurrent mode failure|concurrent mode interrupted)\))?: {mem:old}, {dur}\] {mem:heap}{meta}, {secs}\]{times}",
    )
    .requires(&[OLD, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "cms_concurrent",
        K::CmsConcurrent,
        Legacy,
        r"(?:CMS: abort preclean due to time {ts})?\[CMS-concurrent-(?P<phase>[a-z-]+?)(?:-start)?(?:: {concurrent})?\]{times}",
    )
    .optional(&[Field::ConcurrentTime, Field::Times]),
    //
    // G1, legacy logging. Each pause has a `-XX:+PrintGCDetails` shape
    // (summary in `[Eden: ...]`) and a plain shape. Initial-mark and mixed
    // come before the young entries, which accept any trailing note.
    //
    Definition::new(
        "g1_young_initial_mark_details",
        K::G1YoungInitialMark,
        Legacy,
        r"\[GC pause{cause} \(young\) \(initial-mark\)(?: \(to-space [a-z]+\))?, {secs}\]\s*{g1sum}{times}",
    )
    .requires(&[Field::Memory(Area::Young), HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "g1_young_initial_mark",
        K::G1YoungInitialMark,
        Legacy,
        r"\[GC pause{cause} \(young\) \(initial-mark\)(?: \(to-space [a-z]+\))? {mem:heap}, {secs}\]{times}",
    )
    .requires(&[HEAP, SECS])
    .optional(EXTRAS),
    Definition::new(
        "g1_mixed_pause_details",
        K::G1MixedPause,
        Legacy,
        r"\[GC pause{cause} \(mixed\)(?: \(to-space [a-z]+\))?, {secs}\]\s*{g1sum}{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "g1_mixed_pause",
        K::G1MixedPause,
        Legacy,
        r"\[GC pause{cause} \(mixed\)(?: \(to-space [a-z]+\))? {mem:heap}, {secs}\]{times}",
    )
    .requires(&[HEAP, SECS])
    .optional(EXTRAS),
    Definition::new(
        "g1_young_pause_details",
        K::G1YoungPause,
        Legacy,
        r"\[GC pause{cause} \(young\)(?: \([a-z -]+\))*, {secs}\]\s*{g1sum}{times}",
    )
    .requires(&[YOUNG, HEAP, SECS])
    .optional(EXTRAS_META),
    Definition::new(
        "g1_young_pause",
        K::G1YoungPause,
        Legacy,
        r"\[GC pause{cause} \(young\)(?: \([a-z -]+\))* {mem:heap}, {secs}\]{times}",
    )
    .requires(&[HEAP, SECS])
    .optional(EXTRAS),
    Definition::new(
        "g1_full_gc",
        K::G1FullGc,
        Legacy,
        r"\[Full GC{cause}\s+{mem:heap}, {secs}\](?:\s*\[Eden: [^\]]*\](?:, \[Metaspace: {mem:meta}\])?)?{times}",
    )
    .requires(&[HEAP, SECS])
    .optional(EXTRAS_META)
    .only_for(&[F::G1]),
    Definition::new(
        "g1_remark",
        K::G1Remark,
        Legacy,
        r"\[GC remark(?: .*)?, {secs}\]{times}",
    )
    .requires(&[SECS])
    .optional(&[Field::Times]),
    Definition::new(
        "g1_cleanup",
        K::G1Cleanup,
        Legacy,
        r"\[GC cleanup(?: {mem:heap})?, {secs}\]{times}",
    )
    .requires(&[SECS])
    .optional(&[HEAP, Field::Times]),
    Definition::new(
        "g1_concurrent",
        K::G1Concurrent,
        Legacy,
        r"\[GC concurrent-(?P<phase>[a-z-]+)(?:, (?:[^\]]*, )?{secs})?\]{times}",
    )
    .optional(&[SECS, Field::Times]),
    Definition::new(
        "g1_detail",
        K::G1Detail,
        Legacy,
        r"\s*\[(?:Parallel Time|GC Worker|Ext Root Scanning|Update RS|Processed Buffers|Scan RS|Code Root|Object Copy|Termination|Clear CT|Other|Choose CSet|Ref Proc|Ref Enq|Redirty Cards|Humongous|Free CSet|Eden|Times|String Dedup|Evacuation Failure|Expand Heap|Root Region Scan Waiting)\b.*|\s+(?:Min|Sum|Avg|Max|Diff):.*",
    ),
    //
    // Plain `-XX:+PrintGC` output names no generation, so the family decides
    // the kind. Parallel was the default collector, so it also takes runs
    // whose family is not known.
    //
    Definition::new("parallel_scavenge_plain", K::ParallelScavenge, Legacy, SIMPLE_YOUNG)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Parallel, F::Unknown]),
    Definition::new("parallel_full_plain", K::ParallelCompactingOld, Legacy, SIMPLE_FULL)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Parallel, F::Unknown]),
    Definition::new("serial_new_plain", K::SerialNew, Legacy, SIMPLE_YOUNG)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Serial]),
    Definition::new("serial_old_plain", K::SerialOld, Legacy, SIMPLE_FULL)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Serial]),
    Definition::new("par_new_plain", K::ParNew, Legacy, SIMPLE_YOUNG)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Cms]),
    Definition::new("cms_serial_old_plain", K::CmsSerialOld, Legacy, SIMPLE_FULL)
        .requires(&[HEAP, SECS])
        .optional(EXTRAS)
        .only_for(&[F::Cms]),
    //
    // Unified logging: headers
    //
    Definition::new("using_collector", K::UsingCollector, Unified, r"Using (?P<collector>.+)")
        .requires(&[Field::Header(H::Collector)]),
    Definition::new(
        "header_version_unified",
        K::HeaderVersion,
        Unified,
        r"Version: (?P<jre>\S+)(?: \([^)]*\))?.*",
    )
    .requires(&[Field::Header(H::Version)]),
    Definition::new(
        "header_cpus",
        K::HeaderCpus,
        Unified,
        r"CPUs: (?P<cpus>\d+) total(?:, \d+ available)?",
    )
    .requires(&[Field::Header(H::Cpus)]),
    Definition::new(
        "header_memory_unified",
        K::HeaderMemory,
        Unified,
        r"Memory: (?P<physical_total>{size})",
    )
    .requires(&[Field::Header(H::Memory)]),
    Definition::new(
        "header_heap_capacity",
        K::HeaderHeapCapacity,
        Unified,
        r"Heap (?P<which>Min|Initial|Max) Capacity: (?P<capacity>{size})",
    )
    .requires(&[Field::Header(H::HeapCapacity)]),
    //
    // Unified logging: safepoints
    //
    Definition::new(
        "unified_safepoint",
        K::UnifiedSafepoint,
        Unified,
        r"Total time for which application threads were stopped: {secs}(?:, Stopping threads took: \d+[.,]\d+ seconds)?",
    )
    .requires(&[SECS]),
    Definition::new(
        "unified_safepoint_ns",
        K::UnifiedSafepoint,
        Unified,
        r#"Safepoint "[^"]*", Time since last: \d+ ns, Reaching safepoint: \d+ ns,(?: Cleanup: \d+ ns,)? At safepoint: \d+ ns, Total: {ns}"#,
    )
    .requires(&[NS]),
    //
    // Unified logging: Shenandoah and Z. Their phase names overlap with G1's,
    // so they are guarded by family and come first.
    //
    Definition::new(
        "shenandoah_init_mark",
        K::ShenandoahInitMark,
        Unified,
        r"{gcid} Pause Init (?:Mark|Update Refs)(?: \([^)]*\))* {ms}",
    )
    .requires(&[MS])
    .only_for(&[F::Shenandoah]),
    Definition::new(
        "shenandoah_final_mark",
        K::ShenandoahFinalMark,
        Unified,
        r"{gcid} Pause Final (?:Mark|Update Refs|Evac|Roots)(?: \([^)]*\))* {ms}",
    )
    .requires(&[MS])
    .only_for(&[F::Shenandoah]),
    Definition::new(
        "shenandoah_degenerated",
        K::ShenandoahDegenerated,
        Unified,
        r"{gcid} Pause Degenerated GC(?: \([^)]*\))* {mem:heap} {ms}",
    )
    .requires(&[HEAP, MS])
    .only_for(&[F::Shenandoah]),
    Definition::new(
        "shenandoah_full_gc",
        K::ShenandoahFullGc,
        Unified,
        r"{gcid} Pause Full{cause} {mem:heap} {ms}",
    )
    .requires(&[HEAP, MS])
    .optional(&[Field::Trigger])
    .only_for(&[F::Shenandoah]),
    Definition::new(
        "shenandoah_concurrent",
        K::ShenandoahConcurrent,
        Unified,
        r"{gcid} Concurrent [A-Za-z -]+?(?: \([^)]*\))*(?: {mem:heap})? {ms}",
    )
    .requires(&[MS])
    .optional(&[HEAP])
    .only_for(&[F::Shenandoah]),
    Definition::new(
        "z_pause",
        K::ZPause,
        Unified,
        r"{gcid} (?:[YO]: )?Pause (?:Mark Start|Mark End|Relocate Start)(?: \([^)]*\))? {ms}",
    )
    .requires(&[MS])
    .only_for(&[F::Z]),
    Definition::new(
        "z_concurrent",
        K::ZConcurrent,
        Unified,
        r"{gcid} (?:[YO]: )?Concurrent [A-Za-z -]+? {ms}",
    )
    .requires(&[MS])
    .only_for(&[F::Z]),
    Definition::new(
        "z_collection",
        K::ZCollection,
        Unified,
        r"{gcid} (?:Major |Minor )?(?:Garbage )?Collection{cause} {tr:heap}",
    )
    .requires(&[Field::Transition(Area::Heap)])
    .optional(&[Field::Trigger]),
    //
    // Unified logging: CMS (JDK 9 to 13). Its pause and phase names are
    // shared with G1 and the generational collectors, so the family decides.
    //
    Definition::new(
        "unified_par_new",
        K::UnifiedParNew,
        Unified,
        r"{gcid} Pause Young{cause} {mem:heap} {ms}{gens}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(UNIFIED_EXTRAS)
    .only_for(&[F::Cms]),
    Definition::new(
        "unified_cms_initial_mark",
        K::UnifiedCmsInitialMark,
        Unified,
        r"{gcid} Pause Initial Mark(?: {mem:heap})? {ms}{cpu}",
    )
    .requires(&[MS])
    .optional(&[HEAP, Field::Times])
    .only_for(&[F::Cms]),
    Definition::new(
        "unified_cms_remark",
        K::UnifiedCmsRemark,
        Unified,
        r"{gcid} Pause Remark(?: {mem:heap})? {ms}{cpu}",
    )
    .requires(&[MS])
    .optional(&[HEAP, Field::Times])
    .only_for(&[F::Cms]),
    Definition::new(
        "unified_cms_concurrent",
        K::UnifiedCmsConcurrent,
        Unified,
        r"{gcid} Concurrent (?:Mark|Preclean|Abortable Preclean|Sweep|Reset)(?: \([^)]*\))?(?: {ms})?",
    )
    .optional(&[MS])
    .only_for(&[F::Cms]),
    //
    // Unified logging: G1. The phase-named young pause is G1-only text and
    // comes before the generic young pause, which would also match it.
    //
    Definition::new(
        "unified_g1_mixed_pause",
        K::UnifiedG1MixedPause,
        Unified,
        r"{gcid} Pause (?:Young \(Mixed\)|Mixed){cause}(?: \(Evacuation Failure\))? {mem:heap} {ms}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(EXTRAS),
    Definition::new(
        "unified_g1_young_pause",
        K::UnifiedG1YoungPause,
        Unified,
        r"{gcid} Pause (?:Young \((?:Normal|Concurrent Start|Prepare Mixed|Concurrent End)\)|Initial Mark){cause}(?: \(Evacuation Failure\))? {mem:heap} {ms}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(EXTRAS),
    Definition::new(
        "unified_g1_young_pause_plain",
        K::UnifiedG1YoungPause,
        Unified,
        r"{gcid} Pause Young{cause}(?: \(Evacuation Failure\))? {mem:heap} {ms}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(EXTRAS)
    .only_for(&[F::G1]),
    Definition::new(
        "unified_g1_full_gc",
        K::UnifiedG1FullGc,
        Unified,
        r"{gcid} Pause Full{cause} {mem:heap} {ms}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(EXTRAS)
    .only_for(&[F::G1]),
    Definition::new(
        "unified_g1_remark",
        K::UnifiedG1Remark,
        Unified,
        r"{gcid} Pause Remark(?: {mem:heap})? {ms}{cpu}",
    )
    .requires(&[MS])
    .optional(&[HEAP, Field::Times])
    .only_for(&[F::G1, F::Unknown]),
    Definition::new(
        "unified_g1_cleanup",
        K::UnifiedG1Cleanup,
        Unified,
        r"{gcid} Pause Cleanup(?: {mem:heap})? {ms}{cpu}",
    )
    .requires(&[MS])
    .optional(&[HEAP, Field::Times])
    .only_for(&[F::G1, F::Unknown]),
    //
    // Unified logging: Serial and Parallel
    //
    Definition::new(
        "unified_young_pause",
        K::UnifiedYoungPause,
        Unified,
        r"{gcid} Pause Young(?: \([^()]+\))??{cause} {mem:heap} {ms}{gens}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(UNIFIED_EXTRAS),
    Definition::new(
        "unified_old_pause",
        K::UnifiedOldPause,
        Unified,
        r"{gcid} Pause Full{cause} {mem:heap} {ms}{gens}{cpu}",
    )
    .requires(&[HEAP, MS])
    .optional(UNIFIED_EXTRAS),
    Definition::new(
        "unified_g1_concurrent",
        K::UnifiedG1Concurrent,
        Unified,
        r"{gcid} Concurrent (?:Cycle|Mark Cycle|Mark From Roots|Mark Abort|Mark|Clear Claimed Marks|Scan Root Regions|Preclean|Rebuild Remembered Sets|Cleanup for Next Mark|Undo Cycle)(?: \([^)]*\))?(?: {ms})?",
    )
    .optional(&[MS]),
    Definition::new(
        "unified_generation",
        K::UnifiedGeneration,
        Unified,
        r"{gcid} (?:PSYoungGen|DefNew|ParNew|ParOldGen|PSOldGen|Tenured|CMS|Metaspace): {size}->{size}\({size}\)",
    ),
    //
    // Unified logging: informational. Under the plain `gc` and `safepoint`
    // tags only these known shapes are; anything else is reported.
    //
    Definition::new(
        "unified_safepoint_info",
        K::UnifiedInfo,
        Unified,
        r"Application time: \d+[.,]\d+ seconds|(?:Entering|Leaving) safepoint region(?:: .*)?",
    ),
    Definition::new("shenandoah_trigger", K::UnifiedInfo, Unified, r"Trigger: .*")
        .only_for(&[F::Shenandoah]),
    Definition::new("unified_detail", K::UnifiedInfo, Unified, r".*").tagged(DETAIL_TAGS),
];
