//! Marketplace category service: category routes backed by advertisement storage over HTTP.

fn main() -> std::process::ExitCode {
    server::launch(server::ServiceKind::CategoryService)
}
