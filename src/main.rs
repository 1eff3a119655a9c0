fn main() {
    perf_log_compare::cli::run();
}
