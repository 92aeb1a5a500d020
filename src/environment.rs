use log::debug;

/// What the checker knows about a declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarData {
    pub name: String,
    pub mutable: bool,
    pub array_depth: usize,
}

/// One lexical scope: bindings in declaration order plus the scope it is
/// nested in. Each scope owns its parent, so dropping back out of a block is
/// just unwrapping one level.
#[derive(Debug, Default)]
pub struct Environment {
    values: Vec<VarData>,
    enclosing: Option<Box<Environment>>,
}

impl Environment {
    /// The program (root) scope.
    pub fn new() -> Self {
        Environment {
            values: Vec::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Environment) -> Self {
        Environment {
            values: Vec::new(),
            enclosing: Some(Box::new(enclosing)),
        }
    }

    /// Discard this scope's bindings and hand back the parent.
    /// `None` for the program scope.
    pub fn into_enclosing(self) -> Option<Environment> {
        debug!("Dropping scope with {} binding(s)", self.values.len());

        self.enclosing.map(|parent| *parent)
    }

    /// Bind `var` in this scope. Hands the binding back if the name is
    /// already declared here.
    pub fn define(&mut self, var: VarData) -> Result<(), VarData> {
        if self.get_local(&var.name).is_some() {
            return Err(var);
        }

        debug!("Defining '{}' (depth {})", var.name, var.array_depth);

        self.values.push(var);
        Ok(())
    }

    /// Look `name` up in this scope only.
    pub fn get_local(&self, name: &str) -> Option<&VarData> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Look `name` up here, then outward through every enclosing scope.
    pub fn get(&self, name: &str) -> Option<&VarData> {
        let mut scope = Some(self);

        while let Some(env) = scope {
            if let Some(var) = env.get_local(name) {
                return Some(var);
            }

            scope = env.enclosing.as_deref();
        }

        None
    }

    /// How many scopes enclose this one (0 for the program scope).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.enclosing.as_deref();

        while let Some(env) = scope {
            depth += 1;
            scope = env.enclosing.as_deref();
        }

        depth
    }

    /// Names bound directly in this scope, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }
}
