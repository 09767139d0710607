/// Lexical discovery of addresses in trace output.
pub mod addresses;

/// Rendering of the labeled `cast run` command.
pub mod command;

/// Sources that know the names of deployed contracts.
pub mod identifier;

/// Sequential, paced resolution of many addresses.
pub mod labels;

/// Cache-first name resolution over a primary and a secondary source.
pub mod resolver;
