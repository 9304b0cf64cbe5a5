//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`StriderError`] covers every failure mode of the
//! animation core and its collaborators:
//! - Clip registry lookups and registration collisions
//! - Skeleton mismatches while splicing upper/lower body clips
//! - Asset loading failures reported by a [`ClipSource`](crate::assets::ClipSource)
//! - Configuration parsing and validation
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, StriderError>`.
//!
//! ```rust,ignore
//! use strider::errors::{Result, StriderError};
//!
//! fn start(controller: &mut AnimationController) -> Result<()> {
//!     controller.play("idle")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the animation core.
#[derive(Error, Debug)]
pub enum StriderError {
    // ========================================================================
    // Clip Registry Errors
    // ========================================================================
    /// The requested clip name is not registered (yet) for this character.
    ///
    /// During startup this usually means the clip has not finished loading.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    /// A clip with the same name was already registered for this character.
    #[error("Duplicate animation clip name: {0}")]
    DuplicateClipName(String),

    // ========================================================================
    // Composition Errors
    // ========================================================================
    /// The splice joint index does not exist in the clip's channel list.
    #[error(
        "Incompatible skeleton in clip '{clip}': {channels} channels, splice index {splice_index}"
    )]
    IncompatibleSkeleton {
        /// Name of the clip that is too short
        clip: String,
        /// Number of channels the clip actually has
        channels: usize,
        /// Configured spine channel index
        splice_index: usize,
    },

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The loading collaborator failed to produce clip data.
    #[error("Failed to load animation asset '{url}': {reason}")]
    AssetLoad {
        /// Location of the asset
        url: String,
        /// Human readable failure description
        reason: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StriderError {
    /// Returns `true` for failures the caller may treat as "not ready yet".
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StriderError::ClipNotFound(_) | StriderError::IncompatibleSkeleton { .. }
        )
    }
}

/// Alias for `Result<T, StriderError>`.
pub type Result<T> = std::result::Result<T, StriderError>;
