use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    images,
    locale::{FieldKind, from_stored, to_stored},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{CatalogFilter, ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize(12);
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::cust_with_values("category->>'uk' = ?", [category.clone()]))
                .add(Expr::cust_with_values("category->>'en' = ?", [category.clone()])),
        );
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        let mut any = Condition::any();
        for field in ["name", "description", "origin"] {
            for lang in ["uk", "en"] {
                any = any.add(Expr::cust_with_values(
                    format!("{field}->>'{lang}' ILIKE ?"),
                    [pattern.clone()],
                ));
            }
        }
        condition = condition.add(any);
    }

    match query.filter {
        Some(CatalogFilter::New) => condition = condition.add(Column::IsNew.eq(true)),
        Some(CatalogFilter::Sale) => condition = condition.add(Column::IsOnSale.eq(true)),
        None => {}
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_by {
        ProductSortBy::CreatedAt => finder.order_by(Column::CreatedAt, sort_order),
        ProductSortBy::Price => finder.order_by(Column::Price, sort_order),
        ProductSortBy::Name => finder.order_by(Expr::cust("name->>'uk'"), sort_order),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.image.is_empty() {
        return Err(AppError::BadRequest("image is required".into()));
    }
    if payload.price <= 0 {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(to_stored(&payload.name.normalize(FieldKind::FreeText))),
        description: Set(to_stored(&payload.description.normalize(FieldKind::FreeText))),
        price: Set(payload.price),
        original_price: Set(payload.original_price),
        image: Set(payload.image),
        category: Set(to_stored(&payload.category.normalize(FieldKind::Category))),
        product_type: Set(to_stored(&payload.product_type.normalize(FieldKind::BeanType))),
        weight: Set(to_stored(&payload.weight.normalize(FieldKind::Weight))),
        origin: Set(to_stored(&payload.origin.normalize(FieldKind::FreeText))),
        is_new: Set(payload.is_new.unwrap_or(false)),
        is_on_sale: Set(payload.is_on_sale.unwrap_or(false)),
        in_stock: Set(payload.in_stock.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(to_stored(&name.normalize(FieldKind::FreeText)));
    }
    if let Some(description) = payload.description {
        active.description = Set(to_stored(&description.normalize(FieldKind::FreeText)));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if payload.original_price.is_some() {
        active.original_price = Set(payload.original_price);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(category) = payload.category {
        active.category = Set(to_stored(&category.normalize(FieldKind::Category)));
    }
    if let Some(product_type) = payload.product_type {
        active.product_type = Set(to_stored(&product_type.normalize(FieldKind::BeanType)));
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(to_stored(&weight.normalize(FieldKind::Weight)));
    }
    if let Some(origin) = payload.origin {
        active.origin = Set(to_stored(&origin.normalize(FieldKind::FreeText)));
    }
    if let Some(is_new) = payload.is_new {
        active.is_new = Set(is_new);
    }
    if let Some(is_on_sale) = payload.is_on_sale {
        active.is_on_sale = Set(is_on_sale);
    }
    if let Some(in_stock) = payload.in_stock {
        active.in_stock = Set(in_stock);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn product_from_entity(model: ProductModel) -> Product {
    let image_url = images::resolve(&model.image);
    Product {
        id: model.id,
        name: from_stored(model.name, FieldKind::FreeText),
        description: from_stored(model.description, FieldKind::FreeText),
        price: model.price,
        original_price: model.original_price,
        image: model.image,
        image_url,
        category: from_stored(model.category, FieldKind::Category),
        product_type: from_stored(model.product_type, FieldKind::BeanType),
        weight: from_stored(model.weight, FieldKind::Weight),
        origin: from_stored(model.origin, FieldKind::FreeText),
        is_new: model.is_new,
        is_on_sale: model.is_on_sale,
        in_stock: model.in_stock,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
