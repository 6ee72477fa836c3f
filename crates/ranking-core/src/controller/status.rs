use std::sync::Arc;

use crate::game::RecordPath;
use crate::ranking::RankingList;

/// What the controller currently asserts about its subscription.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RankingStatus {
    #[default]
    Idle,
    /// Subscribed, no snapshot received yet.
    Loading { path: RecordPath },
    /// Latest ranking for `path`. May be empty.
    Ready {
        path: RecordPath,
        ranking: Arc<RankingList>,
    },
    Failed { path: RecordPath, message: String },
}

impl RankingStatus {
    pub fn path(&self) -> Option<RecordPath> {
        match self {
            Self::Idle => None,
            Self::Loading { path } | Self::Ready { path, .. } | Self::Failed { path, .. } => {
                Some(*path)
            }
        }
    }

    pub fn ranking(&self) -> Option<&Arc<RankingList>> {
        match self {
            Self::Ready { ranking, .. } => Some(ranking),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}
