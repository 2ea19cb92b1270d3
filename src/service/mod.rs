pub mod vnstat_service;
