pub mod job_table;
