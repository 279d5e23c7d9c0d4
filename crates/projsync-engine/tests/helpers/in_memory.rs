//! In-memory access system with call recording and fault injection.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use projsync_access::{
    AccessError, AccessResult, CreateOutcome, DeleteOutcome, Lookup, MemberBinding, MemberKind,
    ProjectSpec, ResourceClient, RoleDefinition, PREDEFINED_ROLE_TYPE,
};

/// Failure injected for one call.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    Timeout,
    Status(u16),
}

impl Fault {
    fn to_error(self) -> AccessError {
        match self {
            Fault::Timeout => AccessError::Transport {
                message: "operation timed out".to_string(),
                timed_out: true,
            },
            Fault::Status(status) => AccessError::Status {
                status,
                body: format!("injected {status}"),
            },
        }
    }
}

#[derive(Default)]
struct State {
    projects: Vec<ProjectSpec>,
    roles: HashMap<String, Vec<RoleDefinition>>,
    users: HashMap<String, Vec<MemberBinding>>,
    groups: HashMap<String, Vec<MemberBinding>>,
    faults: HashMap<String, Fault>,
    calls: Vec<String>,
}

impl State {
    fn has_project(&self, key: &str) -> bool {
        self.projects.iter().any(|p| p.project_key == key)
    }

    fn members(&mut self, key: &str, kind: MemberKind) -> &mut Vec<MemberBinding> {
        let table = match kind {
            MemberKind::User => &mut self.users,
            MemberKind::Group => &mut self.groups,
        };
        table.entry(key.to_string()).or_default()
    }
}

/// A system whose predefined roles exist implicitly in every project.
pub struct InMemorySystem {
    name: String,
    reserved: HashSet<String>,
    state: Mutex<State>,
}

fn not_found(what: &str) -> AccessError {
    AccessError::Status {
        status: 404,
        body: format!("{what} not found"),
    }
}

fn collection(kind: MemberKind) -> &'static str {
    match kind {
        MemberKind::User => "user",
        MemberKind::Group => "group",
    }
}

impl InMemorySystem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reserved: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_project(self, key: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .projects
            .push(ProjectSpec::new(key, key.to_uppercase()));
        self
    }

    pub fn with_role(self, key: &str, role: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .roles
            .entry(key.to_string())
            .or_default()
            .push(RoleDefinition::custom(role));
        self
    }

    /// A predefined role: listed in every project, never creatable.
    pub fn with_reserved_role(mut self, role: &str) -> Self {
        self.reserved.insert(role.to_string());
        self
    }

    pub fn with_user(self, key: &str, name: &str, roles: &[&str]) -> Self {
        self.with_member(key, MemberKind::User, name, roles)
    }

    pub fn with_group(self, key: &str, name: &str, roles: &[&str]) -> Self {
        self.with_member(key, MemberKind::Group, name, roles)
    }

    fn with_member(self, key: &str, kind: MemberKind, name: &str, roles: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .members(key, kind)
            .push(MemberBinding::new(name, roles.iter().copied()));
        self
    }

    /// Make every call whose log entry equals `call` fail.
    pub fn fail(self, call: &str, fault: Fault) -> Self {
        self.state
            .lock()
            .unwrap()
            .faults
            .insert(call.to_string(), fault);
        self
    }

    // ── Inspection ────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Logged calls starting with `prefix`, in order.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn project_keys(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .projects
            .iter()
            .map(|p| p.project_key.clone())
            .collect()
    }

    pub fn has_project(&self, key: &str) -> bool {
        self.state.lock().unwrap().has_project(key)
    }

    pub fn role_names(&self, key: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .roles
            .get(key)
            .map(|roles| roles.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn member_roles(&self, key: &str, kind: MemberKind, name: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .members(key, kind)
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.roles.clone())
    }

    /// Log the call and return its injected fault, if any.
    fn enter(&self, call: String) -> AccessResult<()> {
        let mut state = self.state.lock().unwrap();
        let fault = state.faults.get(&call).copied();
        state.calls.push(call);
        match fault {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    fn predefined(&self, role: &str) -> Option<RoleDefinition> {
        self.reserved.get(role).map(|name| RoleDefinition {
            role_type: PREDEFINED_ROLE_TYPE.to_string(),
            ..RoleDefinition::custom(name.clone())
        })
    }
}

#[async_trait]
impl ResourceClient for InMemorySystem {
    fn system(&self) -> &str {
        &self.name
    }

    async fn list_projects(&self) -> AccessResult<Vec<ProjectSpec>> {
        self.enter("list_projects".to_string())?;
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn get_project(&self, project_key: &str) -> AccessResult<Lookup<ProjectSpec>> {
        self.enter(format!("get_project {project_key}"))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .projects
            .iter()
            .find(|p| p.project_key == project_key)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn create_project(&self, project: &ProjectSpec) -> AccessResult<CreateOutcome> {
        self.enter(format!("create_project {}", project.project_key))?;
        let mut state = self.state.lock().unwrap();
        if state.has_project(&project.project_key) {
            return Ok(CreateOutcome::Conflict);
        }
        state.projects.push(project.clone());
        Ok(CreateOutcome::Created)
    }

    async fn update_project(&self, project: &ProjectSpec) -> AccessResult<()> {
        self.enter(format!("update_project {}", project.project_key))?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .projects
            .iter_mut()
            .find(|p| p.project_key == project.project_key)
            .ok_or_else(|| not_found("project"))?;
        *existing = project.clone();
        Ok(())
    }

    async fn delete_project(&self, project_key: &str) -> AccessResult<DeleteOutcome> {
        self.enter(format!("delete_project {project_key}"))?;
        let mut state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Ok(DeleteOutcome::AlreadyAbsent);
        }
        state.projects.retain(|p| p.project_key != project_key);
        state.roles.remove(project_key);
        state.users.remove(project_key);
        state.groups.remove(project_key);
        Ok(DeleteOutcome::Deleted)
    }

    async fn list_roles(&self, project_key: &str) -> AccessResult<Vec<String>> {
        self.enter(format!("list_roles {project_key}"))?;
        let state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Err(not_found("project"));
        }
        let mut names: Vec<String> = self.reserved.iter().cloned().collect();
        names.sort();
        if let Some(roles) = state.roles.get(project_key) {
            names.extend(roles.iter().map(|r| r.name.clone()));
        }
        Ok(names)
    }

    async fn get_role(
        &self,
        project_key: &str,
        role: &str,
    ) -> AccessResult<Lookup<RoleDefinition>> {
        self.enter(format!("get_role {project_key}/{role}"))?;
        let state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Ok(Lookup::NotFound);
        }
        if let Some(predefined) = self.predefined(role) {
            return Ok(Lookup::Found(predefined));
        }
        Ok(state
            .roles
            .get(project_key)
            .and_then(|roles| roles.iter().find(|r| r.name == role).cloned())
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn create_role(
        &self,
        project_key: &str,
        role: &RoleDefinition,
    ) -> AccessResult<CreateOutcome> {
        self.enter(format!("create_role {project_key}/{}", role.name))?;
        let mut state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Err(not_found("project"));
        }
        if self.reserved.contains(&role.name) {
            return Ok(CreateOutcome::Rejected {
                detail: format!("role '{}' is predefined", role.name),
            });
        }
        let roles = state.roles.entry(project_key.to_string()).or_default();
        if roles.iter().any(|r| r.name == role.name) {
            return Ok(CreateOutcome::Conflict);
        }
        roles.push(role.clone());
        Ok(CreateOutcome::Created)
    }

    async fn update_role(&self, project_key: &str, role: &RoleDefinition) -> AccessResult<()> {
        self.enter(format!("update_role {project_key}/{}", role.name))?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .roles
            .get_mut(project_key)
            .and_then(|roles| roles.iter_mut().find(|r| r.name == role.name))
            .ok_or_else(|| not_found("role"))?;
        *existing = role.clone();
        Ok(())
    }

    async fn delete_role(&self, project_key: &str, role: &str) -> AccessResult<DeleteOutcome> {
        self.enter(format!("delete_role {project_key}/{role}"))?;
        let mut state = self.state.lock().unwrap();
        let Some(roles) = state.roles.get_mut(project_key) else {
            return Ok(DeleteOutcome::AlreadyAbsent);
        };
        let before = roles.len();
        roles.retain(|r| r.name != role);
        if roles.len() == before {
            Ok(DeleteOutcome::AlreadyAbsent)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn list_members(
        &self,
        project_key: &str,
        kind: MemberKind,
    ) -> AccessResult<Vec<String>> {
        self.enter(format!("list_{}s {project_key}", collection(kind)))?;
        let mut state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Err(not_found("project"));
        }
        Ok(state
            .members(project_key, kind)
            .iter()
            .map(|m| m.name.clone())
            .collect())
    }

    async fn get_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        name: &str,
    ) -> AccessResult<Lookup<MemberBinding>> {
        self.enter(format!("get_{} {project_key}/{name}", collection(kind)))?;
        let mut state = self.state.lock().unwrap();
        Ok(state
            .members(project_key, kind)
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn upsert_member(
        &self,
        project_key: &str,
        kind: MemberKind,
        binding: &MemberBinding,
    ) -> AccessResult<()> {
        self.enter(format!("upsert_{} {project_key}/{}", collection(kind), binding.name))?;
        let mut state = self.state.lock().unwrap();
        if !state.has_project(project_key) {
            return Err(not_found("project"));
        }
        let members = state.members(project_key, kind);
        match members.iter_mut().find(|m| m.name == binding.name) {
            Some(existing) => *existing = binding.clone(),
            None => members.push(binding.clone()),
        }
        Ok(())
    }
}
