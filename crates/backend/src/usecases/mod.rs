pub mod u501_build_schema;
