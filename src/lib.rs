//! Client library for the QBank digital asset management API.
//!
//! The service hands out folders as a flat list in which every folder carries
//! its ancestry as a tree string. This crate fetches those folders and
//! rebuilds the hierarchy from them.
//!
//! # Modules
//!
//! - `folder_tree`: Rebuilding folder hierarchies from flat folder lists
//! - `model`: Folder data models and tree paths
//! - `property`: Typed folder properties
//! - `http_utils`: Calls to the QBank JSON API
//! - `folder_api`: Folder operations of the QBank API
//! - `configuration`: Configuration management
//! - `format`: Data formatting utilities for various output formats
//! - `exit_codes`: Process exit codes of the command line client

pub mod configuration;
pub mod exit_codes;
pub mod folder_api;
pub mod folder_tree;
pub mod format;
pub mod http_utils;
pub mod model;
pub mod property;
