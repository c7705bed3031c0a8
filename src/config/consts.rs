/// Numbers emitted by the source stage when no input is configured
pub const DEFAULT_INPUT: [i64; 7] = [0, 1, 1, 2, 3, 5, 8];
/// Capacity of every hand-off queue between stages
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;
/// Separator placed between sorted results by the aggregation stage
pub const DEFAULT_SEPARATOR: &str = "_";
/// Fan-out handlers between the source and the aggregation stage
pub const DEFAULT_HANDLERS: [&str; 2] = ["single_digest", "multi_digest"];
/// Number of concurrent checksum phases computed per item by the multi digest
pub const MULTI_DIGEST_PHASES: usize = 6;
/// Separator between the two checksums produced by the single digest
pub const SINGLE_DIGEST_JOINER: &str = "~";
/// Stall applied when the signer's fingerprint is entered concurrently (milliseconds)
pub const DEFAULT_OVERHEAT_PENALTY_MS: u64 = 1_000;
