use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch
/// (1970-01-01).
const NTP_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

/// A 64-bit fixed-point OSC time tag: the high 32 bits count seconds
/// since the NTP epoch, the low 32 bits are fractional seconds.
///
/// The reserved raw value `1` means "execute immediately" and bypasses
/// scheduling entirely. Time tags are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timetag(u64);

impl Timetag {
    /// The reserved "execute immediately" tag.
    pub const IMMEDIATE: Timetag = Timetag(1);

    /// Wraps a raw 64-bit wire value.
    pub fn from_raw(raw: u64) -> Self {
        Timetag(raw)
    }

    /// The raw 64-bit wire value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Whole seconds since the NTP epoch.
    pub fn seconds(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fractional seconds, in units of 1/2^32 s.
    pub fn fraction(&self) -> u32 {
        self.0 as u32
    }

    /// The current wall-clock time as a time tag.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Converts a wall-clock instant into a time tag. Instants before
    /// the Unix epoch saturate to the epoch.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_unix = time
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        let secs = (since_unix.as_secs() + NTP_UNIX_OFFSET_SECS) & u64::from(u32::MAX);
        let frac = (u64::from(since_unix.subsec_nanos()) << 32) / 1_000_000_000;
        Timetag((secs << 32) | frac)
    }

    /// Converts the tag back into a wall-clock instant. Tags before the
    /// Unix epoch saturate to the epoch.
    pub fn to_system_time(&self) -> SystemTime {
        let secs = u64::from(self.seconds()).saturating_sub(NTP_UNIX_OFFSET_SECS);
        let nanos = (u64::from(self.fraction()) * 1_000_000_000) >> 32;
        UNIX_EPOCH + Duration::new(secs, nanos as u32)
    }

    /// How long until this tag is due. Zero for [`Timetag::IMMEDIATE`]
    /// and for any tag at or before the current time; this is what the
    /// dispatcher feeds to its bundle scheduler.
    pub fn time_until_due(&self) -> Duration {
        if *self == Self::IMMEDIATE {
            return Duration::ZERO;
        }
        self.to_system_time()
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }

    /// Big-endian wire encoding.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_is_due_now() {
        assert_eq!(Timetag::IMMEDIATE.time_until_due(), Duration::ZERO);
    }

    #[test]
    fn raw_round_trip() {
        let tag = Timetag::from_raw(0x_1234_5678_9abc_def0);
        assert_eq!(tag.raw(), 0x_1234_5678_9abc_def0);
        assert_eq!(tag.seconds(), 0x_1234_5678);
        assert_eq!(tag.fraction(), 0x_9abc_def0);
    }

    #[test]
    fn unix_epoch_maps_to_ntp_offset() {
        let tag = Timetag::from_system_time(UNIX_EPOCH);
        assert_eq!(u64::from(tag.seconds()), NTP_UNIX_OFFSET_SECS);
        assert_eq!(tag.fraction(), 0);
        assert_eq!(tag.to_system_time(), UNIX_EPOCH);
    }

    #[test]
    fn system_time_round_trip_is_close() {
        let now = SystemTime::now();
        let round_tripped = Timetag::from_system_time(now).to_system_time();
        let drift = match round_tripped.duration_since(now) {
            Ok(d) => d,
            Err(e) => e.duration(),
        };
        // fraction conversion loses sub-nanosecond precision only
        assert!(drift < Duration::from_micros(1));
    }

    #[test]
    fn past_tag_is_due_now() {
        let past = Timetag::from_system_time(SystemTime::now() - Duration::from_secs(60));
        assert_eq!(past.time_until_due(), Duration::ZERO);
    }

    #[test]
    fn future_tag_reports_remaining_delay() {
        let future = Timetag::from_system_time(SystemTime::now() + Duration::from_secs(60));
        let due_in = future.time_until_due();
        assert!(due_in > Duration::from_secs(58));
        assert!(due_in <= Duration::from_secs(60));
    }

    #[test]
    fn wire_encoding_is_big_endian() {
        let tag = Timetag::from_raw(1);
        assert_eq!(tag.to_be_bytes(), [0, 0, 0, 0, 0, 0, 0, 1]);
    }
}
