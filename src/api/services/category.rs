//! Category tree, publication (category-entry) and membership
//! (category-user) operations.

use anyhow::Result;

use crate::api::client::PlatformClient;
use crate::api::filters::{CategoryEntryFilter, CategoryFilter, CategoryUserFilter};
use crate::api::models::{Category, CategoryEntry, CategoryUser, ListResponse};
use crate::api::params::{Pager, ParamList};

/// Fields for `category.add` when creating a channel category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: i64,
    pub owner: String,
    pub privacy: i64,
    pub privacy_context: Option<String>,
    pub user_join_policy: Option<i64>,
    pub appear_in_list: Option<i64>,
    pub inheritance_type: Option<i64>,
    pub default_permission_level: Option<i64>,
    pub contribution_policy: Option<i64>,
    pub moderation: Option<i64>,
}

impl NewCategory {
    fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaCategory")
            .set("name", &self.name)
            .set("parentId", self.parent_id)
            .set("owner", &self.owner)
            .set("privacy", self.privacy)
            .set_opt("privacyContext", self.privacy_context.as_ref())
            .set_opt("userJoinPolicy", self.user_join_policy)
            .set_opt("appearInList", self.appear_in_list)
            .set_opt("inheritanceType", self.inheritance_type)
            .set_opt("defaultPermissionLevel", self.default_permission_level)
            .set_opt("contributionPolicy", self.contribution_policy)
            .set_opt("moderation", self.moderation)
    }
}

pub struct CategoryService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl CategoryService<'_> {
    pub async fn get(&self, id: i64) -> Result<Category> {
        let params = ParamList::new().set("id", id);
        self.client.call("category", "get", params).await
    }

    pub async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client
            .list_all("category", "list", base, 500, None)
            .await
    }

    pub async fn add(&self, category: &NewCategory) -> Result<Category> {
        let params = ParamList::new().nest("category", category.to_params());
        self.client.call("category", "add", params).await
    }
}

pub struct CategoryEntryService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl CategoryEntryService<'_> {
    /// Single-page list; publication checks only need the first page and
    /// the total count.
    pub async fn list(
        &self,
        filter: &CategoryEntryFilter,
    ) -> Result<ListResponse<CategoryEntry>> {
        let params = ParamList::new()
            .nest("filter", filter.to_params())
            .nest("pager", Pager::default().to_params());
        self.client.call("categoryEntry", "list", params).await
    }

    /// Paginate every entry ID published in one category.
    pub async fn entry_ids_in_category(&self, category_id: i64) -> Result<Vec<String>> {
        let filter = CategoryEntryFilter {
            category_id_equal: Some(category_id),
            ..Default::default()
        };
        let base = ParamList::new().nest("filter", filter.to_params());
        let rows: Vec<CategoryEntry> = self
            .client
            .list_all("categoryEntry", "list", base, 500, None)
            .await?;
        Ok(rows.into_iter().map(|ce| ce.entry_id).collect())
    }

    pub async fn add(&self, category_id: i64, entry_id: &str) -> Result<CategoryEntry> {
        let assoc = ParamList::new()
            .set("objectType", "KalturaCategoryEntry")
            .set("categoryId", category_id)
            .set("entryId", entry_id);
        let params = ParamList::new().nest("categoryEntry", assoc);
        self.client.call("categoryEntry", "add", params).await
    }

    pub async fn delete(&self, category_id: i64, entry_id: &str) -> Result<()> {
        let params = ParamList::new()
            .set("entryId", entry_id)
            .set("categoryId", category_id);
        self.client.request("categoryEntry", "delete", params).await?;
        Ok(())
    }
}

/// Permission levels for category membership, as wire integers.
pub mod permission_level {
    pub const MANAGER: i64 = 0;
    pub const MODERATOR: i64 = 1;
    pub const CONTRIBUTOR: i64 = 2;
    pub const MEMBER: i64 = 3;
    pub const NONE: i64 = 4;

    /// Human-readable role name used in reports.
    pub fn role_name(level: i64) -> String {
        match level {
            MANAGER => "Manager".to_string(),
            MODERATOR => "Moderator".to_string(),
            CONTRIBUTOR => "Contributor".to_string(),
            MEMBER => "Member".to_string(),
            NONE => "None".to_string(),
            other => format!("Unknown ({})", other),
        }
    }
}

pub struct CategoryUserService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl CategoryUserService<'_> {
    pub async fn list(&self, filter: &CategoryUserFilter) -> Result<Vec<CategoryUser>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client
            .list_all("categoryUser", "list", base, 500, None)
            .await
    }

    pub async fn add(
        &self,
        category_id: i64,
        user_id: &str,
        permission_level: i64,
    ) -> Result<CategoryUser> {
        let member = ParamList::new()
            .set("objectType", "KalturaCategoryUser")
            .set("categoryId", category_id)
            .set("userId", user_id)
            .set("permissionLevel", permission_level);
        let params = ParamList::new().nest("categoryUser", member);
        self.client.call("categoryUser", "add", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(permission_level::role_name(0), "Manager");
        assert_eq!(permission_level::role_name(3), "Member");
        assert_eq!(permission_level::role_name(9), "Unknown (9)");
    }

    #[test]
    fn test_new_category_params() {
        let category = NewCategory {
            name: "Physics 101".into(),
            parent_id: 42,
            owner: "prof".into(),
            privacy: 3,
            user_join_policy: Some(3),
            ..Default::default()
        };
        let params = category.to_params();
        let find = |key: &str| {
            params
                .entries()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(find("name").as_deref(), Some("Physics 101"));
        assert_eq!(find("parentId").as_deref(), Some("42"));
        assert_eq!(find("userJoinPolicy").as_deref(), Some("3"));
        assert!(find("moderation").is_none());
    }
}
