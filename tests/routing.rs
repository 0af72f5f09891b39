//! Facade-level smoke tests: everything a consumer needs should be
//! reachable through `grappelli::prelude`.

use grappelli::prelude::*;
use rstest::rstest;

fn mvc_router() -> TreeRouter<&'static str> {
	let home = RouteEntry::new("", "home")
		.unwrap()
		.with_default("controller", "Home")
		.with_default("action", "Index");
	TreeRouter::builder()
		.entry(home)
		.route("{controller}/{action=Index}/{id?}", "mvc")
		.unwrap()
		.route("files/{*path}", "files")
		.unwrap()
		.build()
}

#[rstest]
#[case("/", "home")]
#[case("/Products", "mvc")]
#[case("/Products/Details", "mvc")]
#[case("/Products/Details/12", "mvc")]
#[case("/files/css/site.css", "files")]
fn prelude_router_resolves(#[case] path: &str, #[case] expected: &str) {
	let router = mvc_router();
	assert_eq!(*router.resolve(path).unwrap().handler(), expected);
}

#[test]
fn prelude_router_extracts_values_and_defaults() {
	let router = mvc_router();
	let matched = router.resolve("/Products").unwrap();
	assert_eq!(matched.values().get("controller"), Some("Products"));
	assert_eq!(matched.values().get("action"), Some("Index"));

	let matched = router.resolve("/").unwrap();
	assert_eq!(matched.values().get("controller"), Some("Home"));
}

#[test]
fn prelude_exposes_reverse_resolution() {
	let entry = RouteEntry::new("blog/{slug}", "blog")
		.unwrap()
		.with_name("blog-detail");
	let router = TreeRouter::builder().entry(entry).build();
	let url = router
		.url_for("blog-detail", &RouteValues::from_iter([("slug", "welcome")]))
		.unwrap();
	assert_eq!(url, "/blog/welcome");
	assert!(matches!(
		router.url_for("missing", &RouteValues::new()),
		Err(ReverseError::UnknownRoute(_))
	));
}
