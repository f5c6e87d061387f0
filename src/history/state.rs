/// Well-known entries of the cross-run state file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    LatestEnv,
    LatestDate,
    ChecksumIntermediate,
    ChecksumTransport,
    ChecksumHistorical,
    ChecksumParis,
    ChecksumNepn,
}

impl StateKey {
    pub const ALL: [StateKey; 7] = [
        StateKey::LatestEnv,
        StateKey::LatestDate,
        StateKey::ChecksumIntermediate,
        StateKey::ChecksumTransport,
        StateKey::ChecksumHistorical,
        StateKey::ChecksumParis,
        StateKey::ChecksumNepn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::LatestEnv => "EU_LATEST_ENV",
            StateKey::LatestDate => "EU_LATEST_DATE",
            StateKey::ChecksumIntermediate => "CHKSUM_LATEST_INTERMEDIATE",
            StateKey::ChecksumTransport => "CHKSUM_LATEST_TRANSPORT",
            StateKey::ChecksumHistorical => "CHKSUM_LATEST_HISTORICAL",
            StateKey::ChecksumParis => "CHKSUM_PARIS",
            StateKey::ChecksumNepn => "CHKSUM_NEPN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim())
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

pub const ARTIFACT_PREFIX: &str = "CHKSUM_ARTIFACT_";

/// Per-download digest entry, e.g. `CHKSUM_ARTIFACT_SVN_2024_1990_....xlsx`.
pub fn artifact_key(file_name: &str) -> String {
    format!("{}{}", ARTIFACT_PREFIX, file_name)
}
