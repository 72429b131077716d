//! `friendframe me` / `albums`.

use anyhow::Result;

use super::Ctx;
use crate::output::{self, Format};

pub async fn me(ctx: &Ctx) -> Result<()> {
    let me = ctx.client.me().await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&me)?),
        Format::Table => println!("{}", output::user(&me)),
    }
    Ok(())
}

pub async fn albums(ctx: &Ctx) -> Result<()> {
    let albums = ctx.client.list_albums().await?;
    match ctx.format {
        Format::Json => println!("{}", output::json(&albums)?),
        Format::Table if albums.is_empty() => println!("No photo albums linked."),
        Format::Table => println!("{}", output::albums(&albums)),
    }
    Ok(())
}
