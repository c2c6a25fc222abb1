//! Report every category a user belongs to, with their role.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::api::services::category::permission_level;
use crate::api::{CategoryUserFilter, PlatformClient};
use crate::cli::commands::categories::AffiliationsArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;

const HEADERS: &[&str] = &["Username", "Category ID", "Category Name", "Role", "Hierarchy"];

struct Membership {
    user_id: String,
    category_id: i64,
    category_name: String,
    role: String,
    hierarchy: String,
}

impl Membership {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.user_id.clone(),
            self.category_id.to_string(),
            self.category_name.clone(),
            self.role.clone(),
            self.hierarchy.clone(),
        ]
    }
}

async fn memberships_for(client: &PlatformClient, user_id: &str) -> Result<Vec<Membership>> {
    let filter = CategoryUserFilter {
        user_id_equal: Some(user_id.to_string()),
    };
    let category_users = client.category_users().list(&filter).await?;

    let mut memberships = Vec::with_capacity(category_users.len());
    for cu in category_users {
        let category = client.categories().get(cu.category_id).await?;

        // Ownership trumps the membership permission level
        let role = if category.owner.as_deref() == Some(user_id) {
            "Owner".to_string()
        } else {
            permission_level::role_name(cu.permission_level.unwrap_or(permission_level::NONE))
        };

        memberships.push(Membership {
            user_id: user_id.to_string(),
            category_id: cu.category_id,
            category_name: category.name.clone(),
            role,
            hierarchy: category.full_name.unwrap_or_default(),
        });
    }
    Ok(memberships)
}

pub async fn affiliations_command(
    config: &Config,
    profile: Option<&str>,
    args: AffiliationsArgs,
) -> Result<()> {
    let user_ids = split_ids(&args.user_ids);
    if user_ids.is_empty() {
        println!("No user IDs provided. Exiting.");
        return Ok(());
    }

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let dir = reports_dir(&config.settings.reports_dir)?;
    let stamp = now_stamp();

    let mut all_rows = Vec::new();
    for user_id in &user_ids {
        let memberships = memberships_for(&client, user_id).await?;

        if memberships.is_empty() {
            println!("\n0 category affiliations found for user: {}", user_id);
            continue;
        }

        let mut role_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for membership in &memberships {
            *role_counts.entry(membership.role.as_str()).or_default() += 1;
        }

        println!(
            "\n{} category affiliations found for user: {}\n",
            memberships.len(),
            user_id
        );
        for (role, count) in &role_counts {
            println!("  - {} as {}", count, role);
        }
        println!("\nCategory affiliations:");
        for membership in &memberships {
            println!(
                "- {}: {} — {}",
                membership.category_id, membership.category_name, membership.role
            );
        }

        if args.per_user {
            let path = write_csv(
                csv_path(&dir, &stamp, &format!("category_affiliations_{}", user_id)),
                HEADERS,
                memberships.iter().map(Membership::to_record),
            )?;
            println!("\nCSV file created: {:?}", path);
        } else {
            all_rows.extend(memberships.iter().map(Membership::to_record));
        }
    }

    if !args.per_user && !all_rows.is_empty() {
        let path = write_csv(
            csv_path(&dir, &stamp, "category_affiliations"),
            HEADERS,
            all_rows,
        )?;
        println!("\nCSV file created: {:?}", path);
    }
    Ok(())
}
