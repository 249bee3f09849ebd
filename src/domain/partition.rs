//! Report partitions and the cache key scheme derived from them.

use std::fmt;
use std::str::FromStr;

/// Cache key holding the national report.
pub const NATION_KEY: &str = "canada_report";

/// Cache key holding the summary report.
pub const SUMMARY_KEY: &str = "summary";

/// A Canadian province or territory tracked by the upstream API.
///
/// The set is closed: anything outside these 13 codes is not a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Province {
    Ab,
    Bc,
    Mb,
    Nb,
    Nl,
    Ns,
    Nt,
    Nu,
    On,
    Pe,
    Qc,
    Sk,
    Yt,
}

impl Province {
    /// All provinces in refresh order.
    pub const ALL: [Province; 13] = [
        Province::Ab,
        Province::Bc,
        Province::Mb,
        Province::Nb,
        Province::Nl,
        Province::Ns,
        Province::Nt,
        Province::Nu,
        Province::On,
        Province::Pe,
        Province::Qc,
        Province::Sk,
        Province::Yt,
    ];

    /// Lowercase two-letter code, as used in keys and upstream paths.
    pub fn code(self) -> &'static str {
        match self {
            Province::Ab => "ab",
            Province::Bc => "bc",
            Province::Mb => "mb",
            Province::Nb => "nb",
            Province::Nl => "nl",
            Province::Ns => "ns",
            Province::Nt => "nt",
            Province::Nu => "nu",
            Province::On => "on",
            Province::Pe => "pe",
            Province::Qc => "qc",
            Province::Sk => "sk",
            Province::Yt => "yt",
        }
    }

    /// Looks up a province by code, ignoring ASCII case.
    ///
    /// Returns `None` for anything outside the fixed code set.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One report bucket: the whole country, the summary, or a single province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Nation,
    Summary,
    Province(Province),
}

impl Partition {
    /// Every partition in refresh order: nation, provinces in table order, summary.
    pub fn refresh_order() -> Vec<Partition> {
        let mut partitions = Vec::with_capacity(Province::ALL.len() + 2);
        partitions.push(Partition::Nation);
        partitions.extend(Province::ALL.into_iter().map(Partition::Province));
        partitions.push(Partition::Summary);
        partitions
    }

    /// Cache key under which this partition's snapshot is stored.
    pub fn cache_key(&self) -> String {
        match self {
            Partition::Nation => NATION_KEY.to_string(),
            Partition::Summary => SUMMARY_KEY.to_string(),
            Partition::Province(p) => format!("{}_report", p.code()),
        }
    }

    /// Path of this partition's report, relative to the upstream base URL.
    pub fn upstream_path(&self) -> String {
        match self {
            Partition::Nation => "/reports".to_string(),
            Partition::Summary => "/summary".to_string(),
            Partition::Province(p) => format!("/reports/province/{}", p.code()),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Nation => f.write_str("nation"),
            Partition::Summary => f.write_str("summary"),
            Partition::Province(p) => write!(f, "province:{}", p),
        }
    }
}

/// Error returned when a string names no known partition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown partition: {0}")]
pub struct UnknownPartition(pub String);

impl FromStr for Partition {
    type Err = UnknownPartition;

    /// Accepts `nation`, `canada`, `summary`, or a province code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nation" | "canada" => Ok(Partition::Nation),
            "summary" => Ok(Partition::Summary),
            other => Province::from_code(other)
                .map(Partition::Province)
                .ok_or_else(|| UnknownPartition(s.to_string())),
        }
    }
}
