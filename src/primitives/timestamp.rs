/// An absolute point in time.
///
/// encoding name = "ms64", code = 0x83,
/// category = fixed, width = 8
/// label = "64-bit two's-complement integer representing milliseconds since the unix epoch"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Consume the wrapper into the inner `i64`.
    pub fn into_inner(self) -> i64 {
        self.0
    }

    /// Creates a new [`Timestamp`] from milliseconds since the Unix epoch.
    pub fn from_milliseconds(milliseconds: i64) -> Self {
        Self(milliseconds)
    }

    /// The timestamp value in milliseconds since the Unix epoch.
    pub fn milliseconds(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(val: i64) -> Self {
        Self(val)
    }
}

impl From<Timestamp> for i64 {
    fn from(val: Timestamp) -> Self {
        val.0
    }
}

#[cfg(test)]
mod tests {
    use super::Timestamp;

    #[test]
    fn round_trips_through_milliseconds() {
        let ts = Timestamp::from_milliseconds(1_700_000_000_000);
        assert_eq!(ts.milliseconds(), 1_700_000_000_000);
        assert_eq!(ts.into_inner(), 1_700_000_000_000);
    }
}
