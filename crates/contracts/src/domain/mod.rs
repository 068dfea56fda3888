pub mod call_record;
