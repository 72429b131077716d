//! `friendframe groups ...`

use std::sync::Arc;

use anyhow::Result;
use friendframe_client::{GroupUpdate, NewGroup};
use friendframe_flux::{StateStore, use_groups};
use friendframe_types::{GroupId, UserId};

use super::{Ctx, confirm, load};
use crate::output::{self, Format};

pub async fn list(ctx: &Ctx) -> Result<()> {
    let groups = use_groups(ctx.client.clone(), Arc::new(StateStore::new()));
    let groups = load(&groups, &ctx.identity).await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&groups)?),
        Format::Table if groups.is_empty() => println!("No groups yet."),
        Format::Table => println!("{}", output::groups(&groups)),
    }
    Ok(())
}

pub async fn create(
    ctx: &Ctx,
    name: String,
    description: Option<String>,
    cover_image: Option<String>,
) -> Result<()> {
    let group = ctx
        .client
        .create_group(NewGroup { name, description, cover_image })
        .await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&group)?),
        Format::Table => println!("Created group \"{}\" ({}).", group.name, group.id),
    }
    Ok(())
}

pub async fn delete(ctx: &Ctx, id: &str, yes: bool) -> Result<()> {
    if !confirm(yes, &format!("Delete group {}?", id))? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.client.delete_group(&GroupId::new(id)).await?;
    println!("Deleted group {}.", id);
    Ok(())
}

pub async fn remove_member(ctx: &Ctx, group: &str, member: &str) -> Result<()> {
    ctx.client
        .remove_member(&GroupId::new(group), &UserId::new(member))
        .await?;
    println!("Removed {} from group {}.", member, group);
    Ok(())
}

pub async fn update(ctx: &Ctx, group: &str, cover_image: Option<String>) -> Result<()> {
    if cover_image.is_none() {
        anyhow::bail!("Nothing to update (pass --cover)");
    }
    ctx.client
        .update_group(&GroupId::new(group), GroupUpdate { cover_image })
        .await?;
    println!("Updated group {}.", group);
    Ok(())
}

pub async fn join(ctx: &Ctx, token: &str) -> Result<()> {
    if ctx.client.join_group(token).await? {
        println!("Joined group.");
    } else {
        anyhow::bail!("The invite was not accepted");
    }
    Ok(())
}

pub async fn invite(ctx: &Ctx, group: &str) -> Result<()> {
    let token = ctx.client.create_share_token(&GroupId::new(group)).await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&serde_json::json!({ "shareToken": token }))?),
        Format::Table => {
            println!("Share token: {}", token);
            println!("Join with: friendframe groups join {}", token);
        }
    }
    Ok(())
}
