pub mod csv_input;
