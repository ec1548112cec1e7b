use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AdminOrderList, CreateLogRequest, CreateNotificationRequest, LogList,
            NotificationList, NotificationUpdateRequest, StatsResponse, UpdateOrderStatusRequest,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{CartContents, CartUpdateRequest, SaveCartRequest},
        favorites::{AddFavoriteRequest, FavoriteProductList},
        news::NewsList,
        orders::{CreateOrderRequest, CreateOrderResponse, OrderList},
        products::ProductList,
        uploads::UploadResponse,
    },
    locale::LocalizedText,
    models::{
        AdminLogEntry, CartLine, Favorite, NewsArticle, Notification, Order, OrderStatus, Product,
        User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, favorites, health, images, news, orders, params, products, upload},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::verify_email,
        auth::get_profile,
        auth::update_profile,
        auth::delete_account,
        auth::forgot_password,
        auth::reset_password,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        news::list_news,
        news::get_news,
        news::create_news,
        news::update_news,
        news::delete_news,
        cart::get_cart,
        cart::save_cart,
        cart::update_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::create_order,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        images::serve_image,
        upload::upload_image,
        upload::delete_image,
        admin::stats,
        admin::list_notifications,
        admin::create_notification,
        admin::update_notification,
        admin::list_logs,
        admin::create_log,
        admin::list_all_orders,
        admin::update_order_status,
    ),
    components(
        schemas(
            User,
            Product,
            NewsArticle,
            CartLine,
            Order,
            OrderStatus,
            Favorite,
            Notification,
            AdminLogEntry,
            LocalizedText,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SaveCartRequest,
            CartUpdateRequest,
            CartContents,
            CreateOrderRequest,
            CreateOrderResponse,
            OrderList,
            AddFavoriteRequest,
            FavoriteProductList,
            ProductList,
            NewsList,
            UploadResponse,
            StatsResponse,
            NotificationList,
            CreateNotificationRequest,
            NotificationUpdateRequest,
            LogList,
            CreateLogRequest,
            UpdateOrderStatusRequest,
            AdminOrderList,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<NewsList>,
            ApiResponse<OrderList>,
            ApiResponse<CartContents>,
            ApiResponse<StatsResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication and profile endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "News", description = "Content endpoints"),
        (name = "Cart", description = "Cart document endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Images", description = "Content-store image streaming"),
        (name = "Uploads", description = "Image host upload proxy"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
