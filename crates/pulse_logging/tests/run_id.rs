use pulse_logging::{run_id, set_run_id};

#[test]
fn run_id_is_thread_local() {
    set_run_id(7);
    assert_eq!(run_id(), 7);

    let other = std::thread::spawn(run_id).join().unwrap();
    assert_eq!(other, 0);
}

#[test]
fn test_logger_init_is_idempotent() {
    pulse_logging::initialize_for_tests();
    pulse_logging::initialize_for_tests();
    pulse_logging::pulse_info!("logger ready");
}
