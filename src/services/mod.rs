pub mod scheduling_api;
