pub mod action_reader;
pub mod commitment_reader;
pub mod compliance_writer;
