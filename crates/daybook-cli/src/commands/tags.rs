use anyhow::Result;

use crate::views::table::display_tags;
use crate::AppPlanner;

pub async fn list_tags(planner: &AppPlanner) -> Result<()> {
    display_tags(&planner.tag_counts().await?);
    Ok(())
}
