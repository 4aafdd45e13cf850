use messgate::prelude::*;
use messgate::telemetry;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

const ACCOUNTS: [(&str, &str, &str); 3] = [
    ("user@gmail.com", "1234", "user"),
    ("admin@mess.io", "admin", "admin"),
    ("root@mess.io", "root", "superadmin"),
];

fn gateway() -> MemoryGateway {
    ACCOUNTS
        .iter()
        .zip(1u64..)
        .fold(MemoryGateway::new(), |gw, (&(email, password, role), id)| {
            gw.with_account(
                email,
                password,
                GatewayUser {
                    id,
                    email: email.into(),
                    name: email.split('@').next().unwrap_or(email).into(),
                    role: role.into(),
                },
            )
        })
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), MessgateError> {
    telemetry::init();

    let ctl = SessionController::new(gateway(), ControllerConfig::default());

    for (email, password, _) in ACCOUNTS {
        let section = ctl.login(email, password).await?;
        println!("{email} signed in, showing {section}");

        let section = ctl.refresh().await?;
        println!("  tokens refreshed, still on {section}");

        ctl.logout().await;
        println!("  signed out, back to {}", ctl.current_section());
    }

    // Wrong password: not an Err, the failure lands in the record.
    let section = ctl.login("user@gmail.com", "nope").await?;
    if let Some(error) = ctl.observe().last_error() {
        println!("bad password ({}): {}, showing {section}", error.kind, error.message);
    }

    // Malformed input never reaches the gateway.
    match ctl.login("not-an-email", "1234").await {
        Err(e) => println!("rejected locally: {e}"),
        Ok(section) => println!("unexpectedly signed in, showing {section}"),
    }

    tracing::info!(
        logins = ctl.gateway().login_calls(),
        refreshes = ctl.gateway().refresh_calls(),
        "walkthrough finished"
    );
    Ok(())
}
