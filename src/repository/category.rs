//! Category persistence and tree maintenance.
//!
//! # Invariants
//! - A root has `level = 0` and `path = slug`.
//! - A child has `level = parent.level + 1` and `path = parent.path + "/" + slug`.
//! - After a slug or parent change, every descendant is rewritten in the
//!   same connection/transaction as the change itself.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::category::{self, Entity as CategoryEntity};

#[derive(Error, Debug)]
pub enum CategoryRepoError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("No category with id {0} was found.")]
    NotFound(Uuid),
    #[error("No parent category with id {0} was found.")]
    ParentNotFound(Uuid),
    #[error("Category {0} cannot be moved under itself or one of its descendants.")]
    Cycle(Uuid),
}

pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub display_order: i32,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(None)` detaches the category and makes it a root.
    pub parent_id: Option<Option<Uuid>>,
    pub display_order: Option<i32>,
    /// `Some(None)` clears the column, as for the other nullable fields.
    pub icon_url: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub async fn find_by_id<C>(db: &C, id: Uuid) -> Result<Option<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryEntity::find_by_id(id).one(db).await
}

pub async fn find_by_slug<C>(db: &C, slug: &str) -> Result<Option<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryEntity::find()
        .filter(category::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn find_children<C>(db: &C, parent_id: Uuid) -> Result<Vec<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryEntity::find()
        .filter(category::Column::ParentId.eq(parent_id))
        .order_by_asc(category::Column::DisplayOrder)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
}

pub async fn find_all_active<C>(db: &C) -> Result<Vec<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    CategoryEntity::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Level)
        .order_by_asc(category::Column::DisplayOrder)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
}

/// Active categories whose every ancestor is active too.
pub async fn find_all_visible<C>(db: &C) -> Result<Vec<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Ok(reachable_from_roots(find_all_active(db).await?))
}

/// The category with `slug`, if it and all of its ancestors are active.
pub async fn find_visible_by_slug<C>(db: &C, slug: &str) -> Result<Option<category::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let category = match find_by_slug(db, slug).await? {
        Some(category) if category.is_active => category,
        _ => return Ok(None),
    };

    let mut seen = HashSet::from([category.id]);
    let mut parent_id = category.parent_id;
    while let Some(id) = parent_id {
        if !seen.insert(id) {
            return Ok(None);
        }
        match find_by_id(db, id).await? {
            Some(parent) if parent.is_active => parent_id = parent.parent_id,
            _ => return Ok(None),
        }
    }
    Ok(Some(category))
}

/// Keeps the categories reachable from a root (`parent_id = None`) through
/// categories of the same list, preserving the input order.
pub fn reachable_from_roots(categories: Vec<category::Model>) -> Vec<category::Model> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut queue = VecDeque::new();
    for category in &categories {
        match category.parent_id {
            Some(parent_id) => children.entry(parent_id).or_default().push(category.id),
            None => queue.push_back(category.id),
        }
    }

    let mut reachable = HashSet::new();
    while let Some(id) = queue.pop_front() {
        if reachable.insert(id) {
            queue.extend(children.remove(&id).unwrap_or_default());
        }
    }
    categories
        .into_iter()
        .filter(|category| reachable.contains(&category.id))
        .collect()
}

/// Path and level of a category with the given slug placed under `parent`.
pub fn child_path(parent: Option<&category::Model>, slug: &str) -> (String, i32) {
    match parent {
        Some(parent) => (format!("{}/{}", parent.path, slug), parent.level + 1),
        None => (slug.to_string(), 0),
    }
}

pub async fn insert<C>(db: &C, new: NewCategory) -> Result<category::Model, CategoryRepoError>
where
    C: ConnectionTrait,
{
    let parent = match new.parent_id {
        Some(parent_id) => Some(
            find_by_id(db, parent_id)
                .await?
                .ok_or(CategoryRepoError::ParentNotFound(parent_id))?,
        ),
        None => None,
    };
    let (path, level) = child_path(parent.as_ref(), &new.slug);
    let now = Utc::now();

    let model = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        slug: Set(new.slug),
        parent_id: Set(new.parent_id),
        path: Set(path),
        level: Set(level),
        display_order: Set(new.display_order),
        icon_url: Set(new.icon_url),
        description: Set(new.description),
        is_active: Set(new.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}

/// Applies `changes` and, when the slug or the parent moved, rewrites the
/// path and level of the whole subtree. Returns the updated category.
pub async fn update<C>(
    db: &C,
    id: Uuid,
    changes: CategoryChanges,
) -> Result<category::Model, CategoryRepoError>
where
    C: ConnectionTrait,
{
    let current = find_by_id(db, id)
        .await?
        .ok_or(CategoryRepoError::NotFound(id))?;

    let parent_id = changes.parent_id.unwrap_or(current.parent_id);
    let parent = match parent_id {
        Some(parent_id) => {
            let parent = find_by_id(db, parent_id)
                .await?
                .ok_or(CategoryRepoError::ParentNotFound(parent_id))?;
            ensure_not_descendant(db, &parent, id).await?;
            Some(parent)
        }
        None => None,
    };

    let slug = changes.slug.unwrap_or_else(|| current.slug.clone());
    let (path, level) = child_path(parent.as_ref(), &slug);
    let moved = path != current.path;

    let mut model: category::ActiveModel = current.into();
    if let Some(name) = changes.name {
        model.name = Set(name);
    }
    model.slug = Set(slug);
    model.parent_id = Set(parent_id);
    model.path = Set(path);
    model.level = Set(level);
    if let Some(display_order) = changes.display_order {
        model.display_order = Set(display_order);
    }
    if let Some(icon_url) = changes.icon_url {
        model.icon_url = Set(icon_url);
    }
    if let Some(description) = changes.description {
        model.description = Set(description);
    }
    if let Some(is_active) = changes.is_active {
        model.is_active = Set(is_active);
    }
    model.updated_at = Set(Utc::now());

    let updated = model.update(db).await?;
    if moved {
        rebuild_descendants(db, &updated).await?;
    }
    Ok(updated)
}

/// Walks up from `candidate_parent` and fails if `id` is one of its ancestors
/// (or the candidate itself).
async fn ensure_not_descendant<C>(
    db: &C,
    candidate_parent: &category::Model,
    id: Uuid,
) -> Result<(), CategoryRepoError>
where
    C: ConnectionTrait,
{
    let mut seen = HashSet::new();
    let mut cursor = Some(candidate_parent.clone());
    while let Some(node) = cursor {
        if node.id == id {
            return Err(CategoryRepoError::Cycle(id));
        }
        if !seen.insert(node.id) {
            // stored data already loops; stop walking
            break;
        }
        cursor = match node.parent_id {
            Some(parent_id) => find_by_id(db, parent_id).await?,
            None => None,
        };
    }
    Ok(())
}

/// Breadth-first rewrite of `path`/`level` below `root`. Returns the number
/// of descendants that changed.
pub async fn rebuild_descendants<C>(db: &C, root: &category::Model) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    let mut updated = 0;
    let mut visited = HashSet::from([root.id]);
    let mut queue = VecDeque::from([root.clone()]);

    while let Some(node) = queue.pop_front() {
        for child in find_children(db, node.id).await? {
            if !visited.insert(child.id) {
                continue;
            }
            let (path, level) = child_path(Some(&node), &child.slug);
            let child = if child.path != path || child.level != level {
                let mut model: category::ActiveModel = child.into();
                model.path = Set(path);
                model.level = Set(level);
                model.updated_at = Set(Utc::now());
                updated += 1;
                model.update(db).await?
            } else {
                child
            };
            queue.push_back(child);
        }
    }
    Ok(updated)
}

pub async fn delete_by_id<C>(db: &C, id: Uuid) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let result = CategoryEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub path: String,
    pub level: i32,
    pub display_order: i32,
    pub icon_url: Option<String>,
    pub children: Vec<CategoryNode>,
}

/// Assembles a nested tree from a flat list. Siblings are ordered by
/// `display_order`, then `name`. A category whose parent is not part of the
/// list is treated as a root.
pub fn build_tree(categories: Vec<category::Model>) -> Vec<CategoryNode> {
    let ids: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let mut by_parent: HashMap<Option<Uuid>, Vec<category::Model>> = HashMap::new();
    for category in categories {
        let key = category.parent_id.filter(|parent_id| ids.contains(parent_id));
        by_parent.entry(key).or_default().push(category);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
    }
    attach_children(None, &mut by_parent)
}

fn attach_children(
    parent_id: Option<Uuid>,
    by_parent: &mut HashMap<Option<Uuid>, Vec<category::Model>>,
) -> Vec<CategoryNode> {
    let siblings = by_parent.remove(&parent_id).unwrap_or_default();
    siblings
        .into_iter()
        .map(|category| CategoryNode {
            children: attach_children(Some(category.id), by_parent),
            id: category.id,
            name: category.name,
            slug: category.slug,
            path: category.path,
            level: category.level,
            display_order: category.display_order,
            icon_url: category.icon_url,
        })
        .collect()
}
