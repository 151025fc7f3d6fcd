//! Marketplace advertisement storage: advertisements, categories and title search over PostgreSQL.

fn main() -> std::process::ExitCode {
    server::launch(server::ServiceKind::AdvertisementsStorage)
}
