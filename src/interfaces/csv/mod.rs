pub mod membership_writer;
