//! Logical resource names for the v1.1 API, grouped by section.
//!
//! Each [`ResourceEndpoint`] pairs a method with a path template whose `{placeholders}` are
//! filled by [`ResourceEndpoint::resolve_path`]. The table is static; nothing here touches the
//! network.

// self
use crate::{_prelude::*, error::ConfigError, http::HttpMethod, oauth1};

/// Account settings, messages, and coupons of the authenticated user.
pub const ACCOUNT_MANAGEMENT: &str = "account_management";
/// Public marketplace data: games, expansions, products, articles, users.
pub const MARKET_PLACE: &str = "market_place";
/// Orders of the authenticated user.
pub const ORDER_MANAGEMENT: &str = "order_management";
/// Shopping cart of the authenticated user.
pub const SHOPPING_CART_MANIPULATION: &str = "shopping_cart_manipulation";
/// Stock of the authenticated seller.
pub const STOCK_MANAGEMENT: &str = "stock_management";
/// Wants lists of the authenticated user.
pub const WANTS_LIST_MANAGEMENT: &str = "wants_list_management";

/// One named resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceEndpoint {
	/// Section the resource belongs to.
	pub section: &'static str,
	/// Resource name, unique within its section.
	pub name: &'static str,
	/// HTTP verb.
	pub method: HttpMethod,
	/// Path template relative to the base endpoint.
	pub path: &'static str,
	/// Human-readable summary.
	pub description: &'static str,
}
impl ResourceEndpoint {
	const fn new(
		section: &'static str,
		name: &'static str,
		method: HttpMethod,
		path: &'static str,
		description: &'static str,
	) -> Self {
		Self { section, name, method, path, description }
	}

	/// Placeholder names in template order.
	pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
		self.path.split('/').filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
	}

	/// Fills every placeholder from `params`, percent-encoding each value as a path segment.
	///
	/// Parameters that match no placeholder are ignored.
	pub fn resolve_path(&self, params: &[(&str, &str)]) -> Result<String, ConfigError> {
		let mut resolved = String::with_capacity(self.path.len());

		for segment in self.path.split('/').skip(1) {
			resolved.push('/');

			match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
				Some(placeholder) => {
					let (_, value) =
						params.iter().find(|(key, _)| *key == placeholder).ok_or_else(|| {
							ConfigError::MissingPathParameter {
								resource: self.name,
								parameter: placeholder.to_owned(),
							}
						})?;

					resolved.push_str(&oauth1::percent_encode(value));
				},
				None => resolved.push_str(segment),
			}
		}

		Ok(resolved)
	}
}

const RESOURCES: &[ResourceEndpoint] = &[
	// account_management
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"account",
		HttpMethod::Get,
		"/account",
		"Returns the account entity of the authenticated user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"vacation",
		HttpMethod::Put,
		"/account/vacation/{vacation}",
		"Sets the vacation status of the authenticated user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"language",
		HttpMethod::Put,
		"/account/language/{language}",
		"Sets the display language of the authenticated user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"messages",
		HttpMethod::Get,
		"/account/messages",
		"Returns the message thread overview.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"message_thread",
		HttpMethod::Get,
		"/account/messages/{user}",
		"Returns the message thread with one user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"send_message",
		HttpMethod::Post,
		"/account/messages/{user}",
		"Sends a message to one user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"delete_message",
		HttpMethod::Delete,
		"/account/messages/{user}/{message}",
		"Deletes one message from a thread.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"delete_message_thread",
		HttpMethod::Delete,
		"/account/messages/{user}",
		"Deletes the whole message thread with one user.",
	),
	ResourceEndpoint::new(
		ACCOUNT_MANAGEMENT,
		"redeem_coupon",
		HttpMethod::Post,
		"/account/coupon",
		"Redeems one or more coupons.",
	),
	// market_place
	ResourceEndpoint::new(MARKET_PLACE, "games", HttpMethod::Get, "/games", "Returns all games."),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"expansion",
		HttpMethod::Get,
		"/expansion/{game}",
		"Returns all expansions of a game.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"expansion_singles",
		HttpMethod::Get,
		"/expansion/{game}/{name}",
		"Returns the single cards of an expansion.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"product",
		HttpMethod::Get,
		"/product/{product}",
		"Returns a product by ID.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"metaproduct",
		HttpMethod::Get,
		"/metaproduct/{metaproduct}",
		"Returns a metaproduct by ID.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"find_metaproduct",
		HttpMethod::Get,
		"/metaproducts/{name}/{game}/{language}",
		"Searches metaproducts by name.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"find_product",
		HttpMethod::Get,
		"/products/{name}/{game}/{language}/{match}",
		"Searches products by name.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"articles",
		HttpMethod::Get,
		"/articles/{product}",
		"Returns the articles offered for a product.",
	),
	ResourceEndpoint::new(
		MARKET_PLACE,
		"user",
		HttpMethod::Get,
		"/user/{user}",
		"Returns a user by ID or name.",
	),
	// order_management
	ResourceEndpoint::new(
		ORDER_MANAGEMENT,
		"order",
		HttpMethod::Get,
		"/order/{order}",
		"Returns an order by ID.",
	),
	ResourceEndpoint::new(
		ORDER_MANAGEMENT,
		"change_state",
		HttpMethod::Put,
		"/order/{order}",
		"Changes the state of an order.",
	),
	ResourceEndpoint::new(
		ORDER_MANAGEMENT,
		"filter_orders",
		HttpMethod::Get,
		"/orders/{actor}/{state}",
		"Returns the orders of an actor in a given state.",
	),
	ResourceEndpoint::new(
		ORDER_MANAGEMENT,
		"evaluate_order",
		HttpMethod::Post,
		"/order/{order}/evaluation",
		"Evaluates a received order.",
	),
	// shopping_cart_manipulation
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"shopping_cart",
		HttpMethod::Get,
		"/shoppingcart",
		"Returns the shopping cart.",
	),
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"change_cart",
		HttpMethod::Put,
		"/shoppingcart",
		"Adds articles to or removes articles from the shopping cart.",
	),
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"empty_cart",
		HttpMethod::Delete,
		"/shoppingcart",
		"Empties the shopping cart.",
	),
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"shipping_address",
		HttpMethod::Put,
		"/shoppingcart/shippingaddress/{reservation}",
		"Changes the shipping address of a reservation.",
	),
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"shipping_method",
		HttpMethod::Get,
		"/shoppingcart/shippingmethod/{reservation}",
		"Returns the available shipping methods of a reservation.",
	),
	ResourceEndpoint::new(
		SHOPPING_CART_MANIPULATION,
		"change_shipping_method",
		HttpMethod::Put,
		"/shoppingcart/shippingmethod/{reservation}",
		"Changes the shipping method of a reservation.",
	),
	// stock_management
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"stock",
		HttpMethod::Get,
		"/stock",
		"Returns the stock of the authenticated seller.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"stock_file",
		HttpMethod::Get,
		"/stock/file",
		"Returns the stock as a base64-encoded, gzipped CSV file.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"stock_by_name",
		HttpMethod::Get,
		"/stock/articles/{name}/{game}",
		"Searches the stock by product name.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"add_article",
		HttpMethod::Post,
		"/stock",
		"Adds articles to the stock.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"change_article",
		HttpMethod::Put,
		"/stock",
		"Changes articles in the stock.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"delete_article",
		HttpMethod::Delete,
		"/stock",
		"Removes articles from the stock.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"increase_stock",
		HttpMethod::Put,
		"/stock/increase",
		"Increases the quantity of stock articles.",
	),
	ResourceEndpoint::new(
		STOCK_MANAGEMENT,
		"decrease_stock",
		HttpMethod::Put,
		"/stock/decrease",
		"Decreases the quantity of stock articles.",
	),
	// wants_list_management
	ResourceEndpoint::new(
		WANTS_LIST_MANAGEMENT,
		"wants_lists",
		HttpMethod::Get,
		"/wantslist",
		"Returns the wants lists.",
	),
	ResourceEndpoint::new(
		WANTS_LIST_MANAGEMENT,
		"create_wants_list",
		HttpMethod::Post,
		"/wantslist",
		"Creates a wants list.",
	),
	ResourceEndpoint::new(
		WANTS_LIST_MANAGEMENT,
		"wants_list",
		HttpMethod::Get,
		"/wantslist/{wants}",
		"Returns the items of a wants list.",
	),
	ResourceEndpoint::new(
		WANTS_LIST_MANAGEMENT,
		"change_wants_list",
		HttpMethod::Put,
		"/wantslist/{wants}",
		"Adds, edits, or removes wants list items.",
	),
	ResourceEndpoint::new(
		WANTS_LIST_MANAGEMENT,
		"delete_wants_list",
		HttpMethod::Delete,
		"/wantslist/{wants}",
		"Deletes a wants list.",
	),
];

/// Every known resource, in table order.
pub fn resources() -> &'static [ResourceEndpoint] {
	RESOURCES
}

/// Resources grouped by section, sections in lexical order.
pub fn sections() -> BTreeMap<&'static str, Vec<&'static ResourceEndpoint>> {
	let mut grouped = BTreeMap::<_, Vec<_>>::new();

	for resource in RESOURCES {
		grouped.entry(resource.section).or_default().push(resource);
	}

	grouped
}

/// Finds a resource by section and name.
pub fn lookup(section: &str, name: &str) -> Result<&'static ResourceEndpoint, ConfigError> {
	RESOURCES.iter().find(|r| r.section == section && r.name == name).ok_or_else(|| {
		ConfigError::UnknownResource { section: section.to_owned(), name: name.to_owned() }
	})
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn names_are_unique_within_sections() {
		let mut seen = HashSet::new();

		for resource in resources() {
			assert!(
				seen.insert((resource.section, resource.name)),
				"Duplicate resource `{}.{}`.",
				resource.section,
				resource.name
			);
			assert!(resource.path.starts_with('/'), "Path of `{}` must be absolute.", resource.name);
		}
	}

	#[test]
	fn every_section_is_populated() {
		let grouped = sections();

		assert_eq!(
			grouped.keys().copied().collect::<Vec<_>>(),
			[
				ACCOUNT_MANAGEMENT,
				MARKET_PLACE,
				ORDER_MANAGEMENT,
				SHOPPING_CART_MANIPULATION,
				STOCK_MANAGEMENT,
				WANTS_LIST_MANAGEMENT,
			]
		);
		assert!(grouped.values().all(|resources| !resources.is_empty()));
	}

	#[test]
	fn lookup_finds_known_resources() {
		let games = lookup(MARKET_PLACE, "games").expect("Games resource should exist.");

		assert_eq!(games.method, HttpMethod::Get);
		assert_eq!(games.path, "/games");

		let account = lookup(ACCOUNT_MANAGEMENT, "account").expect("Account resource should exist.");

		assert_eq!(account.path, "/account");
	}

	#[test]
	fn lookup_rejects_unknown_resources() {
		let err = lookup(MARKET_PLACE, "account").expect_err("Resource lives in another section.");

		assert!(matches!(
			err,
			ConfigError::UnknownResource { section, name } if section == MARKET_PLACE && name == "account"
		));
	}

	#[test]
	fn resolve_path_encodes_values() {
		let find = lookup(MARKET_PLACE, "find_product").expect("Product search should exist.");

		assert_eq!(find.placeholders().collect::<Vec<_>>(), ["name", "game", "language", "match"]);
		assert_eq!(
			find.resolve_path(&[
				("language", "1"),
				("game", "1"),
				("name", "Black Lotus"),
				("match", "false"),
				("unused", "ignored"),
			])
			.expect("All placeholders are supplied."),
			"/products/Black%20Lotus/1/1/false"
		);
	}

	#[test]
	fn resolve_path_reports_missing_parameters() {
		let singles = lookup(MARKET_PLACE, "expansion_singles").expect("Singles should exist.");
		let err = singles.resolve_path(&[("game", "1")]).expect_err("Name is missing.");

		assert!(matches!(
			err,
			ConfigError::MissingPathParameter { resource: "expansion_singles", parameter }
				if parameter == "name"
		));
	}
}
