/*
 * Responsibility
 * - v1 の URL 構造を定義 (route table)
 * - route ごとに requires_auth を持たせ、true のものにだけ auth gate を掛ける
 * - 同じ path に public / protected の method が混在してもよい (Router が merge する)
 */
use axum::{
    Router,
    routing::{MethodRouter, delete, get, post, put},
};

use crate::api::v1::handlers::{
    health::health,
    login::login,
    posts::{
        create_post, delete_post, feed, get_post, like_post, list_user_posts, unlike_post,
        update_post,
    },
    users::{
        create_user, delete_user, follow_user, get_user, list_followers, list_following,
        search_users, unfollow_user, update_password, update_user,
    },
};
use crate::middleware::auth::access;
use crate::state::AppState;

pub struct Route {
    pub path: &'static str,
    pub handler: MethodRouter<AppState>,
    pub requires_auth: bool,
}

impl Route {
    fn public(path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            path,
            handler,
            requires_auth: false,
        }
    }

    fn protected(path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            path,
            handler,
            requires_auth: true,
        }
    }
}

pub fn table() -> Vec<Route> {
    vec![
        Route::public("/health", get(health)),
        Route::public("/login", post(login)),
        // users
        Route::public("/users", post(create_user)),
        Route::protected("/users", get(search_users)),
        Route::protected("/users/{user_id}", get(get_user)),
        Route::protected("/users/{user_id}", put(update_user)),
        Route::protected("/users/{user_id}", delete(delete_user)),
        Route::protected("/users/{user_id}/follow", post(follow_user)),
        Route::protected("/users/{user_id}/unfollow", post(unfollow_user)),
        Route::protected("/users/{user_id}/followers", get(list_followers)),
        Route::protected("/users/{user_id}/following", get(list_following)),
        Route::protected("/users/{user_id}/update-password", post(update_password)),
        Route::protected("/users/{user_id}/posts", get(list_user_posts)),
        // posts
        Route::protected("/posts", post(create_post)),
        Route::protected("/posts", get(feed)),
        Route::protected("/posts/{post_id}", get(get_post)),
        Route::protected("/posts/{post_id}", put(update_post)),
        Route::protected("/posts/{post_id}", delete(delete_post)),
        Route::protected("/posts/{post_id}/like", post(like_post)),
        Route::protected("/posts/{post_id}/unlike", post(unlike_post)),
    ]
}

pub fn routes(state: AppState) -> Router<AppState> {
    table().into_iter().fold(Router::new(), |router, route| {
        let handler = if route.requires_auth {
            access::apply(route.handler, state.clone())
        } else {
            route.handler
        };
        router.route(route.path, handler)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_health_signup_and_login_are_public() {
        let mut public: Vec<&str> = table()
            .iter()
            .filter(|route| !route.requires_auth)
            .map(|route| route.path)
            .collect();
        public.sort_unstable();

        assert_eq!(public, vec!["/health", "/login", "/users"]);
    }
}
