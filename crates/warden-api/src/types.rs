use serde::{Deserialize, Serialize};

/// Entry of the list payload `POST /domains/` consumes.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewDomain {
    pub name: String,
    pub wildcard: bool,
    pub donated: bool,
    /// The backend expects the literal string "null" when nobody donated.
    pub donated_by: String,
    pub user_only: bool,
}

impl NewDomain {
    /// A plain domain with every optional flag defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wildcard: false,
            donated: false,
            donated_by: "null".to_string(),
            user_only: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub blacklisted: u64,
    pub premium: u64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub total: u64,
    pub storage_used: u64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DomainStats {
    pub count: u64,
}

/// Aggregate of the three independent stats reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TotalStats {
    pub total_users: u64,
    pub total_files: u64,
    pub total_bans: u64,
    pub premium: u64,
    pub storage_used: u64,
    pub count: u64,
}

impl TotalStats {
    pub fn from_parts(users: UserStats, files: FileStats, domains: DomainStats) -> Self {
        Self {
            total_users: users.total,
            total_files: files.total,
            total_bans: users.blacklisted,
            premium: users.premium,
            storage_used: files.storage_used,
            count: domains.count,
        }
    }
}
