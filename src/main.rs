fn main() -> std::process::ExitCode {
    docflow_lib::run()
}
