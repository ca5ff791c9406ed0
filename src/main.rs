use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = zk_ssg::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
