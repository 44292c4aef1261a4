//! Community pages, rules and flairs

use std::sync::Arc;

use crate::app::validation::require_text;
use crate::domain::entities::{
    CommunityFlair, CommunityId, CommunityPage, CommunityRule, FlairId, NewCommunityFlair,
    NewCommunityPage, NewCommunityRule, PageId, RuleId, RuleType, DEFAULT_FLAIR_COLOR,
    FLAIR_NAME_MAX_LEN, PAGE_TITLE_MAX_LEN, RULE_TITLE_MAX_LEN,
};
use crate::domain::ports::CommunityContentRepository;
use crate::error::AppError;

/// Partial page update
#[derive(Debug, Clone, Default)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial rule update
#[derive(Debug, Clone, Default)]
pub struct RuleUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rule_type: Option<RuleType>,
}

/// Partial flair update
#[derive(Debug, Clone, Default)]
pub struct FlairUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

pub struct CommunityContentService<K>
where
    K: CommunityContentRepository,
{
    content: Arc<K>,
}

impl<K> CommunityContentService<K>
where
    K: CommunityContentRepository,
{
    pub fn new(content: Arc<K>) -> Self {
        Self { content }
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    pub async fn create_page(
        &self,
        community_id: &CommunityId,
        title: &str,
        content: &str,
    ) -> Result<CommunityPage, AppError> {
        require_text("Page title", title, PAGE_TITLE_MAX_LEN)?;

        Ok(self
            .content
            .create_page(&NewCommunityPage {
                community_id: *community_id,
                title: title.to_string(),
                content: content.to_string(),
            })
            .await?)
    }

    pub async fn list_pages(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityPage>, AppError> {
        Ok(self.content.list_pages(community_id).await?)
    }

    pub async fn update_page(
        &self,
        id: &PageId,
        update: PageUpdate,
    ) -> Result<CommunityPage, AppError> {
        let mut page = self
            .content
            .find_page(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page {}", id)))?;

        if let Some(title) = update.title {
            require_text("Page title", &title, PAGE_TITLE_MAX_LEN)?;
            page.title = title;
        }
        if let Some(content) = update.content {
            page.content = content;
        }

        Ok(self.content.update_page(&page).await?)
    }

    pub async fn delete_page(&self, id: &PageId) -> Result<(), AppError> {
        Ok(self.content.delete_page(id).await?)
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    pub async fn create_rule(
        &self,
        community_id: &CommunityId,
        title: &str,
        description: &str,
        rule_type: RuleType,
    ) -> Result<CommunityRule, AppError> {
        require_text("Rule title", title, RULE_TITLE_MAX_LEN)?;

        Ok(self
            .content
            .create_rule(&NewCommunityRule {
                community_id: *community_id,
                title: title.to_string(),
                description: description.to_string(),
                rule_type,
            })
            .await?)
    }

    pub async fn list_rules(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityRule>, AppError> {
        Ok(self.content.list_rules(community_id).await?)
    }

    pub async fn update_rule(
        &self,
        id: &RuleId,
        update: RuleUpdate,
    ) -> Result<CommunityRule, AppError> {
        let mut rule = self
            .content
            .find_rule(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rule {}", id)))?;

        if let Some(title) = update.title {
            require_text("Rule title", &title, RULE_TITLE_MAX_LEN)?;
            rule.title = title;
        }
        if let Some(description) = update.description {
            rule.description = description;
        }
        if let Some(rule_type) = update.rule_type {
            rule.rule_type = rule_type;
        }

        Ok(self.content.update_rule(&rule).await?)
    }

    pub async fn delete_rule(&self, id: &RuleId) -> Result<(), AppError> {
        Ok(self.content.delete_rule(id).await?)
    }

    // ------------------------------------------------------------------------
    // Flairs
    // ------------------------------------------------------------------------

    /// Create a flair. A missing colour falls back to the default red.
    pub async fn create_flair(
        &self,
        community_id: &CommunityId,
        name: &str,
        color: Option<&str>,
    ) -> Result<CommunityFlair, AppError> {
        require_text("Flair name", name, FLAIR_NAME_MAX_LEN)?;
        let color = color.unwrap_or(DEFAULT_FLAIR_COLOR);
        validate_color(color)?;

        Ok(self
            .content
            .create_flair(&NewCommunityFlair {
                community_id: *community_id,
                name: name.to_string(),
                color: color.to_uppercase(),
            })
            .await?)
    }

    pub async fn get_flair(&self, id: &FlairId) -> Result<CommunityFlair, AppError> {
        self.content
            .find_flair(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flair {}", id)))
    }

    pub async fn list_flairs(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityFlair>, AppError> {
        Ok(self.content.list_flairs(community_id).await?)
    }

    pub async fn update_flair(
        &self,
        id: &FlairId,
        update: FlairUpdate,
    ) -> Result<CommunityFlair, AppError> {
        let mut flair = self.get_flair(id).await?;

        if let Some(name) = update.name {
            require_text("Flair name", &name, FLAIR_NAME_MAX_LEN)?;
            flair.name = name;
        }
        if let Some(color) = update.color {
            validate_color(&color)?;
            flair.color = color.to_uppercase();
        }

        Ok(self.content.update_flair(&flair).await?)
    }

    /// Delete a flair; posts wearing it are left without one
    pub async fn delete_flair(&self, id: &FlairId) -> Result<(), AppError> {
        self.content.delete_flair(id).await?;
        tracing::info!(flair_id = %id, "Flair deleted");
        Ok(())
    }
}

/// Colours are `#RRGGBB` hex triplets
fn validate_color(color: &str) -> Result<(), AppError> {
    let re = regex::Regex::new(r"^#[0-9A-Fa-f]{6}$")
        .map_err(|e| AppError::Internal(format!("colour pattern: {}", e)))?;

    if re.is_match(color) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Flair colour '{}' must look like #RRGGBB",
            color
        )))
    }
}
