//! Account commands.

use stockroom_client::SignupRequest;

use crate::console::Console;
use crate::context::AppContext;

pub async fn signup(ctx: &AppContext, email: &str) -> anyhow::Result<()> {
    let message = ctx.backend.signup(email).await?;
    println!("{message}");
    println!("Finish with: stockroom verify --email {email} --name <NAME> --otp <CODE>");
    Ok(())
}

pub async fn verify(ctx: &AppContext, console: &mut Console, name: String, otp: String) -> anyhow::Result<()> {
    let request = SignupRequest {
        name,
        email: ctx.email(console).await?,
        password: ctx.password(console).await?,
        otp,
    };

    let session = ctx.backend.verify(&request).await?;
    println!("Account created. Welcome, {}!", session.display_name());
    Ok(())
}

pub async fn login(ctx: &AppContext, console: &mut Console) -> anyhow::Result<()> {
    let session = ctx.login(console).await?;

    println!("Logged in as {}", session.display_name());
    println!("  user id: {}", session.user_id);
    println!("  scope:   {}", ctx.scope(&session));
    if session.is_admin {
        println!("  role:    admin");
    }
    Ok(())
}
