//! Marketplace users service: user records over PostgreSQL.

fn main() -> std::process::ExitCode {
    server::launch(server::ServiceKind::UsersService)
}
