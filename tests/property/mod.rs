// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the merge engine and the cumulative converter.

mod merge_properties;
mod conversion_properties;
