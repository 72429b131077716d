//! `friendframe frames ...`

use std::sync::Arc;

use anyhow::Result;
use friendframe_client::NewFrame;
use friendframe_flux::{StateStore, use_frames};
use friendframe_types::{FrameId, GroupId};

use super::{Ctx, confirm, load};
use crate::output::{self, Format};

pub async fn list(ctx: &Ctx, ungrouped: bool) -> Result<()> {
    let frames = if ungrouped {
        ctx.client.list_ungrouped_frames().await?
    } else {
        let frames = use_frames(ctx.client.clone(), Arc::new(StateStore::new()));
        load(&frames, &ctx.identity).await?
    };
    match ctx.format {
        Format::Json => println!("{}", output::json(&frames)?),
        Format::Table if frames.is_empty() => println!("No frames."),
        Format::Table => println!("{}", output::frames(&frames)),
    }
    Ok(())
}

pub async fn register(
    ctx: &Ctx,
    serial_number: String,
    name: Option<String>,
    group: Option<String>,
) -> Result<()> {
    let frame = ctx
        .client
        .register_frame(NewFrame {
            serial_number,
            name,
            group_id: group.map(GroupId::from),
            battery_level: None,
        })
        .await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&frame)?),
        Format::Table => println!("Registered frame {}.", frame.id),
    }
    Ok(())
}

pub async fn unregister(ctx: &Ctx, id: &str, yes: bool) -> Result<()> {
    if !confirm(yes, &format!("Unregister frame {}?", id))? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.client.unregister_frame(&FrameId::new(id)).await?;
    println!("Unregistered frame {}.", id);
    Ok(())
}

pub async fn add_to_group(ctx: &Ctx, frame: &str, group: &str) -> Result<()> {
    ctx.client
        .add_frame_to_group(&FrameId::new(frame), &GroupId::new(group))
        .await?;
    println!("Added frame {} to group {}.", frame, group);
    Ok(())
}
