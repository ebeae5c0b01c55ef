//! Hive Core
//!
//! Core types and pure logic for the Hive pipeline monitor.
//!
//! This crate contains:
//! - Domain types: pipelines, service descriptors, service state, targets
//! - DTOs: the wire contract of the hive backend
//! - Topology: compiling a pipeline's service map into a renderable graph
//! - Status: classifying a service state into the closed status set

pub mod domain;
pub mod dto;
pub mod status;
pub mod topology;
