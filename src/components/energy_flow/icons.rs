use std::collections::HashMap;

use log::warn;
use web_sys::HtmlImageElement;

use super::types::{FlowNode, NodeRole};

/// One decoded image per role. Loading is left to the browser; an icon is
/// drawn from the first frame after it finishes.
#[derive(Default)]
pub struct IconCache {
	images: HashMap<NodeRole, (String, HtmlImageElement)>,
}

impl IconCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts loading icons whose source changed and forgets roles that no
	/// longer have one.
	pub fn sync(&mut self, nodes: &[FlowNode]) {
		self.images.retain(|role, _| {
			nodes
				.iter()
				.any(|n| n.role == *role && n.icon.is_some())
		});
		for node in nodes {
			let Some(src) = node.icon.as_deref() else {
				continue;
			};
			if self.images.get(&node.role).is_some_and(|(cached, _)| cached == src) {
				continue;
			}
			match HtmlImageElement::new() {
				Ok(image) => {
					image.set_src(src);
					self.images.insert(node.role, (src.to_string(), image));
				}
				Err(err) => warn!("cannot create icon image for {:?}: {:?}", node.role, err),
			}
		}
	}

	pub fn clear(&mut self) {
		self.images.clear();
	}

	/// The role's image once it has loaded and decoded to a real size.
	pub fn ready(&self, role: NodeRole) -> Option<&HtmlImageElement> {
		self.images
			.get(&role)
			.map(|(_, image)| image)
			.filter(|image| image.complete() && image.natural_width() > 0)
	}
}
