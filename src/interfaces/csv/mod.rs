pub mod agreement_writer;
pub mod command_reader;
pub mod record_reader;
