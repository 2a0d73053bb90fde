//! Paging bar rendering
//!
//! Renders the first / previous / `index / total` / next / last navigation
//! bar of a detail view from an already built [`PagingState`]. Rendering
//! runs no queries; every link carries the total, head and tail ids plus the
//! caller's carry-forward parameters so the next request can skip them.

use std::sync::Arc;

use crate::config::PagingConfig;
use crate::model::Pageable;
use crate::params::{keys, ParamSet};
use crate::routes::{RouteKind, RouteTable};
use crate::state::PagingState;

/// View helper producing paging links and the navigation bar
#[derive(Debug, Clone)]
pub struct PagingHelper {
    routes: Arc<RouteTable>,
    config: PagingConfig,
}

impl PagingHelper {
    pub fn new(routes: Arc<RouteTable>, config: PagingConfig) -> Self {
        Self { routes, config }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Navigation bar of `current_entry`, or `None` when there is nothing to
    /// page through
    pub fn paging_bar<M: Pageable>(
        &self,
        current_entry: Option<&M>,
        paging: &PagingState,
        paging_params: &ParamSet,
    ) -> Option<String> {
        let entry = current_entry?;
        let total = paging.total_count.filter(|total| *total > 0)?;
        let current = paging.current_index.unwrap_or(0);

        let (mut prev_index, mut next_index) = if total == 1 {
            (1, 1)
        } else {
            (current.saturating_sub(1), current.saturating_add(1))
        };
        if next_index > total {
            next_index = total;
        }
        if next_index == 0 {
            prev_index = 1;
        }

        let shared = ParamSet::new()
            .with(keys::TOTAL_COUNT, total)
            .with_opt(keys::HEAD_ID, paging.head_id)
            .with_opt(keys::TAIL_ID, paging.tail_id)
            .merge(paging_params);
        let route = paging.route;

        let head_href = if current == 1 {
            self.inert()
        } else {
            let params = ParamSet::new().with(keys::CURRENT_INDEX, 1).merge(&shared);
            self.parse_link(Some(entry), paging.head_id, &params, route)
        };

        let prev_href = match paging.prev_id {
            None => self.inert(),
            Some(prev_id) => {
                let params = ParamSet::new()
                    .with_opt(keys::NEXT_ID, entry.paging_id())
                    .with(keys::CURRENT_INDEX, prev_index)
                    .merge(&shared);
                self.parse_link(Some(entry), Some(prev_id), &params, route)
            }
        };

        let next_href = match paging.next_id {
            None => self.inert(),
            Some(next_id) => {
                let params = ParamSet::new()
                    .with_opt(keys::PREV_ID, entry.paging_id())
                    .with(keys::CURRENT_INDEX, next_index)
                    .merge(&shared);
                self.parse_link(Some(entry), Some(next_id), &params, route)
            }
        };

        let tail_href = if current == total {
            self.inert()
        } else {
            let params = ParamSet::new().with(keys::CURRENT_INDEX, total).merge(&shared);
            self.parse_link(Some(entry), paging.tail_id, &params, route)
        };

        let button = &self.config.button_class;
        let step = self.config.step_classes();
        let mut html = String::new();
        html.push_str(&format!("<div class='{}'>", attr(&self.config.container_class)));
        html.push_str(&format!("<a href='{}' class='{}'>│&lt;</a>", attr(&head_href), attr(button)));
        html.push_str(&format!("<a href='{}' class='{}'>&lt;</a>", attr(&prev_href), attr(&step)));
        html.push_str(&format!(
            "<a href='{}' class='{}'>{} / {}</a>",
            attr(&self.config.inert_href),
            attr(button),
            current,
            total
        ));
        html.push_str(&format!("<a href='{}' class='{}'>&gt;</a>", attr(&next_href), attr(&step)));
        html.push_str(&format!("<a href='{}' class='{}'>&gt;│</a>", attr(&tail_href), attr(button)));
        html.push_str("</div>");

        Some(html)
    }

    /// URL of record `id` of the entry's type with `params` attached.
    ///
    /// Degrades to the inert href when the entry or id is missing, or when
    /// the route cannot be built.
    pub fn parse_link<M: Pageable>(
        &self,
        entry: Option<&M>,
        id: Option<i64>,
        params: &ParamSet,
        route: Option<RouteKind>,
    ) -> String {
        let (Some(_), Some(id)) = (entry, id) else {
            return self.inert();
        };

        let kind = route.unwrap_or(self.config.default_route);
        match self.routes.url_for(M::resource_name(), kind, id, params) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    resource = M::resource_name(),
                    route = %kind,
                    error = %err,
                    "Paging link unavailable, rendering inert link"
                );
                self.inert()
            }
        }
    }

    /// Link from a list row to the entry's own page, carrying `paging_params`
    pub fn entry_link<M: Pageable>(
        &self,
        entry: &M,
        route: Option<RouteKind>,
        paging_params: &ParamSet,
    ) -> String {
        self.parse_link(Some(entry), entry.paging_id(), paging_params, route)
    }

    fn inert(&self) -> String {
        self.config.inert_href.clone()
    }
}

fn attr(value: &str) -> String {
    html_escape::encode_single_quoted_attribute(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        id: Option<i64>,
    }

    impl Pageable for Post {
        fn table_name() -> &'static str {
            "posts"
        }

        fn paging_id(&self) -> Option<i64> {
            self.id
        }
    }

    fn helper() -> PagingHelper {
        PagingHelper::new(
            Arc::new(RouteTable::new().resource("posts")),
            PagingConfig::default(),
        )
    }

    fn hrefs(html: &str) -> Vec<String> {
        html.split("href='")
            .skip(1)
            .map(|rest| rest.split('\'').next().unwrap_or_default().to_string())
            .collect()
    }

    fn state(prev: Option<i64>, next: Option<i64>, current: i64) -> PagingState {
        PagingState {
            prev_id: prev,
            next_id: next,
            head_id: Some(5),
            tail_id: Some(20),
            current_index: Some(current),
            total_count: Some(4),
            route: None,
        }
    }

    #[test]
    fn test_no_entry_or_empty_set_renders_nothing() {
        let helper = helper();
        let post = Post { id: Some(12) };

        assert!(helper
            .paging_bar::<Post>(None, &state(Some(8), Some(20), 3), &ParamSet::new())
            .is_none());
        assert!(helper
            .paging_bar(Some(&post), &PagingState::with_total(0), &ParamSet::new())
            .is_none());
        assert!(helper
            .paging_bar(Some(&post), &PagingState::empty(), &ParamSet::new())
            .is_none());
    }

    #[test]
    fn test_middle_record_links() {
        let helper = helper();
        let post = Post { id: Some(12) };

        let html = helper
            .paging_bar(Some(&post), &state(Some(8), Some(20), 3), &ParamSet::new())
            .unwrap();

        assert_eq!(
            hrefs(&html),
            vec![
                "/posts/5?c_i=1&amp;t_c=4&amp;h=5&amp;t=20",
                "/posts/8?n=12&amp;c_i=2&amp;t_c=4&amp;h=5&amp;t=20",
                "#",
                "/posts/20?p=12&amp;c_i=4&amp;t_c=4&amp;h=5&amp;t=20",
                "/posts/20?c_i=4&amp;t_c=4&amp;h=5&amp;t=20",
            ]
        );
        assert!(html.starts_with("<div class='page fr'>"));
        assert!(html.contains("class='btt'>3 / 4</a>"));
        assert!(html.contains("class='btt bttb'>&lt;</a>"));
    }

    #[test]
    fn test_boundaries_are_inert() {
        let helper = helper();

        let head = Post { id: Some(5) };
        let html = helper
            .paging_bar(Some(&head), &state(None, Some(8), 1), &ParamSet::new())
            .unwrap();
        let links = hrefs(&html);
        assert_eq!(links[0], "#");
        assert_eq!(links[1], "#");
        assert_ne!(links[3], "#");

        let tail = Post { id: Some(20) };
        let html = helper
            .paging_bar(Some(&tail), &state(Some(12), None, 4), &ParamSet::new())
            .unwrap();
        let links = hrefs(&html);
        assert_eq!(links[3], "#");
        assert_eq!(links[4], "#");
        assert_ne!(links[0], "#");
    }

    #[test]
    fn test_single_record_set() {
        let helper = helper();
        let only = Post { id: Some(12) };
        let paging = PagingState {
            head_id: Some(12),
            tail_id: Some(12),
            current_index: Some(1),
            total_count: Some(1),
            ..PagingState::default()
        };

        let html = helper.paging_bar(Some(&only), &paging, &ParamSet::new()).unwrap();
        assert!(hrefs(&html).iter().all(|href| href == "#"));
        assert!(html.contains("1 / 1"));
    }

    #[test]
    fn test_single_record_set_collapses_step_indices() {
        let helper = helper();
        let only = Post { id: Some(12) };
        // Neighbours carried over from a stale link
        let paging = PagingState {
            prev_id: Some(8),
            next_id: Some(20),
            head_id: Some(12),
            tail_id: Some(12),
            current_index: Some(1),
            total_count: Some(1),
            route: None,
        };

        let html = helper.paging_bar(Some(&only), &paging, &ParamSet::new()).unwrap();
        let links = hrefs(&html);
        assert_eq!(links[1], "/posts/8?n=12&amp;c_i=1&amp;t_c=1&amp;h=12&amp;t=12");
        assert_eq!(links[3], "/posts/20?p=12&amp;c_i=1&amp;t_c=1&amp;h=12&amp;t=12");
        assert_eq!(links[0], "#");
        assert_eq!(links[4], "#");
    }

    #[test]
    fn test_extreme_index_does_not_overflow() {
        let helper = helper();
        let post = Post { id: Some(12) };

        let html = helper
            .paging_bar(Some(&post), &state(Some(8), Some(20), i64::MAX), &ParamSet::new())
            .unwrap();
        let links = hrefs(&html);
        assert!(links[1].contains(&format!("c_i={}", i64::MAX - 1)));
        assert!(links[3].contains("c_i=4"));

        let html = helper
            .paging_bar(Some(&post), &state(Some(8), Some(20), i64::MIN), &ParamSet::new())
            .unwrap();
        let links = hrefs(&html);
        assert!(links[1].contains(&format!("c_i={}", i64::MIN)));
        assert!(links[3].contains(&format!("c_i={}", i64::MIN + 1)));
    }

    #[test]
    fn test_carry_params_and_route_override() {
        let helper = helper();
        let post = Post { id: Some(12) };
        let carry = ParamSet::new().with("title", "it's rust");
        let paging = state(Some(8), Some(20), 3).with_route(RouteKind::Edit);

        let html = helper.paging_bar(Some(&post), &paging, &carry).unwrap();
        let links = hrefs(&html);
        assert_eq!(
            links[3],
            "/posts/20/edit?p=12&amp;c_i=4&amp;t_c=4&amp;h=5&amp;t=20&amp;title=it%27s+rust"
        );
    }

    #[test]
    fn test_next_index_clamped_to_total() {
        let helper = helper();
        let post = Post { id: Some(20) };
        // Stale state claiming a next record past the end
        let html = helper
            .paging_bar(Some(&post), &state(Some(12), Some(21), 4), &ParamSet::new())
            .unwrap();
        assert!(hrefs(&html)[3].contains("c_i=4"));
    }

    #[test]
    fn test_unsaved_entry_links() {
        let helper = helper();
        let draft = Post { id: None };
        let paging = PagingState {
            next_id: Some(5),
            head_id: Some(5),
            tail_id: Some(20),
            current_index: Some(0),
            total_count: Some(4),
            ..PagingState::default()
        };

        let html = helper.paging_bar(Some(&draft), &paging, &ParamSet::new()).unwrap();
        let links = hrefs(&html);
        assert_eq!(links[1], "#");
        assert_eq!(links[3], "/posts/5?c_i=1&amp;t_c=4&amp;h=5&amp;t=20");
    }

    #[test]
    fn test_parse_link_degrades_to_inert() {
        let helper = helper();
        let post = Post { id: Some(12) };
        let params = ParamSet::new();

        assert_eq!(helper.parse_link::<Post>(None, Some(5), &params, None), "#");
        assert_eq!(helper.parse_link(Some(&post), None, &params, None), "#");

        let unrouted = PagingHelper::new(Arc::new(RouteTable::new()), PagingConfig::default());
        assert_eq!(unrouted.parse_link(Some(&post), Some(5), &params, None), "#");
    }

    #[test]
    fn test_entry_link_carries_params() {
        let helper = helper();
        let post = Post { id: Some(12) };
        let carry = ParamSet::new().with("title", "rust");

        assert_eq!(
            helper.entry_link(&post, Some(RouteKind::Edit), &carry),
            "/posts/12/edit?title=rust"
        );
        assert_eq!(helper.entry_link(&Post { id: None }, None, &carry), "#");
    }
}
