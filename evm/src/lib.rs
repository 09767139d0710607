//! Contract labels for EVM transaction traces.
//!
//! Finds the addresses a trace mentions, asks block explorers what they are called and renders a
//! `cast run` invocation that carries the answers as `--label` flags.

pub mod trace;

pub use trace::{
    addresses::{extract_addresses, extract_addresses_from_file, Address},
    command::ReplayCommand,
    identifier::{ContractNameSource, EtherscanIdentifier, SourcifyIdentifier},
    labels::{resolve_labels, LabelMap, LabelReport, Pacing},
    resolver::{NameCache, NameResolver},
};
