/// who is performing an operation: only authenticated users can own follows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
	Anonymous,
	Authenticated {
		id: String,
	},
}

impl Identity {
	pub fn user(id: impl ToString) -> Self {
		Identity::Authenticated { id: id.to_string() }
	}

	pub fn my_id(&self) -> Option<&str> {
		match self {
			Identity::Anonymous => None,
			Identity::Authenticated { id } => Some(id.as_str()),
		}
	}

	pub fn is_anon(&self) -> bool {
		matches!(self, Self::Anonymous)
	}
}
