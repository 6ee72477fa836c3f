pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod game;
pub mod ranking;
pub mod store;

pub use config::Config;
pub use controller::{LiveRankingController, RankingStatus, StatusObserver};
pub use error::{Error, Result};
pub use export::{DirectorySink, DownloadSink, RankingExporter};
pub use game::{GameType, RecordPath};
pub use ranking::{Medal, RankingEntry, RankingList, RankingSummary, Record, project};
pub use store::{
    MemoryRecordStore, RecordStore, RestRecordStore, SubscriptionHandle, SubscriptionListener,
};
