mod lock_ignore_poison;
pub use lock_ignore_poison::lock_ignore_poison;
