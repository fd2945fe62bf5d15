//! Domain layer: view models and the pure mappers that build them.
//!
//! Every mapper takes a lenient backend DTO from [`crate::backend::dto`]
//! and returns a UI-shaped view model. Nothing here performs I/O.

pub mod dashboard;
pub mod datetime;
pub mod deposit_credit;
pub mod network;
pub mod normalize;
pub mod pagination;
pub mod promotion;
pub mod telemetry;
pub mod transaction;
pub mod user;
pub mod withdrawal;

pub use dashboard::{AdminBlockchainSummary, AdminDashboardOverview, AdminManualDepositResult};
pub use deposit_credit::{AdminDepositCreditItem, AdminDepositCreditsReport};
pub use network::Network;
pub use pagination::{PageWindow, PaginatedResult};
pub use promotion::{AdminPromotion, PromotionDraft, PromotionStatus};
pub use telemetry::{AdminAuditLog, AdminDepositScanLog, AdminHealthcheck, AdminSweepLog};
pub use transaction::AdminTransaction;
pub use user::{AdminUser, UserRole, UserStatus};
pub use withdrawal::AdminWithdrawRequest;
