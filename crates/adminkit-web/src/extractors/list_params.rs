//! Listing query parameters.

use std::collections::HashMap;

use adminkit_core::types::sorting::SortDirection;
use adminkit_crud::request::ListRequest;

/// Raw query parameters of a listing request.
///
/// `sort_by`, `sort_order` and `page` are pulled out; everything else is
/// passed through to module hooks. Unparseable values are treated as
/// absent, so the configured defaults apply.
#[derive(Debug, Clone)]
pub struct ListParams(pub HashMap<String, String>);

impl ListParams {
    /// Convert into the orchestrator's list request.
    pub fn into_list_request(self) -> ListRequest {
        let mut params = self.0;

        let sort_by = params.remove("sort_by").filter(|v| !v.is_empty());
        let sort_order = params
            .remove("sort_order")
            .and_then(|v| SortDirection::parse(&v));
        let page = params.remove("page").and_then(|v| v.parse::<u64>().ok());

        ListRequest {
            sort_by,
            sort_order,
            page,
            query: params,
        }
    }
}
