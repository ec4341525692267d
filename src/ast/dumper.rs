//! AST Dumper module
//!
//! Renders what resolution attached to the tree, one line per annotated node,
//! prefixed with the node number. Names are suffixed with `#n`, the node
//! that declares them.

use crate::ast::{Ast, DeclContext, LinkageKind, NodeKind, NodeRef, Resolved, TypedefResolution};

/// Dumper for resolution results
pub struct AstDumper;

impl AstDumper {
    /// Print the resolution dump to stdout
    pub fn print_resolution(ast: &Ast) {
        for line in Self::dump_resolution(ast) {
            println!("{}", line);
        }
    }

    pub fn dump_resolution(ast: &Ast) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, kind) in ast.kinds.iter().enumerate() {
            let node = NodeRef::new(i as u32 + 1).expect("NodeRef overflow");
            if let Some(line) = Self::dump_node(ast, node, kind) {
                lines.push(format!("{}: {}", node.get(), line));
            }
        }
        lines
    }

    fn dump_node(ast: &Ast, node: NodeRef, kind: &NodeKind) -> Option<String> {
        match kind {
            NodeKind::ExprId(data) => {
                let name = ast.spelling(data.token);
                let target = match data.resolved.get() {
                    Resolved::None => "unresolved".to_string(),
                    Resolved::Declarator(d) => format!("decl {}", Self::named(ast, d)),
                    Resolved::Enumerator(e) => format!("enumerator {}", Self::named(ast, e)),
                    Resolved::InParamIdList { list, slot } => format!("param list #{}[{}]", list.get(), slot),
                    Resolved::Label(l) => format!("label {}", Self::named(ast, l)),
                    Resolved::Builtin => "builtin".to_string(),
                };
                Some(format!("id {} -> {}", name, target))
            }
            NodeKind::TypeSpecifierTdid(data) => {
                let name = ast.spelling(data.token);
                let target = match data.resolved.get() {
                    TypedefResolution::Unresolved => "unresolved".to_string(),
                    TypedefResolution::Declarator(d) => format!("decl {}", Self::named(ast, d)),
                    TypedefResolution::Builtin => "builtin".to_string(),
                };
                Some(format!("typedef name {} -> {}", name, target))
            }
            NodeKind::DirectDeclaratorId(data) => {
                let context = match data.context.get()? {
                    DeclContext::StructDecl(_) => "member",
                    DeclContext::ParameterDecl(_) => "parameter",
                    DeclContext::InitDecl(_) => "init declarator",
                    DeclContext::FunctionDef(_) => "function definition",
                };
                Some(format!("declare {} as {}", ast.spelling(data.token), context))
            }
            NodeKind::InitDeclarator(data) => Self::dump_linkage(ast, node, data.linkage.kind(), data.linkage.target()),
            NodeKind::FunctionDefinition(data) => {
                Self::dump_linkage(ast, node, data.linkage.kind(), data.linkage.target())
            }
            NodeKind::StructOrUnionRef(data) => {
                let name = ast.spelling(data.token);
                if let Some(decl) = data.declaration.get() {
                    Some(format!("{:?} {} usage -> #{}", data.kind, name, decl.get()))
                } else {
                    Some(format!("{:?} {} declaration chain {}", data.kind, name, Self::chain(ast, node)))
                }
            }
            NodeKind::StructOrUnionDef(data) => {
                let name = ast.spelling(data.token?);
                Some(format!("{:?} {} definition chain {}", data.kind, name, Self::chain(ast, node)))
            }
            NodeKind::EnumRef(data) => {
                let target = data
                    .definition
                    .get()
                    .map_or_else(|| "unresolved".to_string(), |d| format!("#{}", d.get()));
                Some(format!("enum {} -> {}", ast.spelling(data.token), target))
            }
            NodeKind::StmtCompound(data) => {
                let labels = data.labels.borrow();
                if labels.is_empty() {
                    return None;
                }
                let names: Vec<String> = labels.iter().map(|&l| Self::named(ast, l)).collect();
                Some(format!("labels {}", names.join(", ")))
            }
            _ => None,
        }
    }

    fn dump_linkage(ast: &Ast, node: NodeRef, kind: LinkageKind, target: Option<NodeRef>) -> Option<String> {
        if kind == LinkageKind::None && target.is_none() {
            return None;
        }
        let ddid = ast.declarator_id_of(node)?;
        let mut line = format!("linkage {} {:?}", Self::named(ast, ddid), kind);
        if let Some(target) = target {
            line.push_str(&format!(" -> #{}", target.get()));
        }
        Some(line)
    }

    fn chain(ast: &Ast, node: NodeRef) -> String {
        let mut members = ast.tag_chain_members(node);
        members.sort();
        let members: Vec<String> = members.iter().map(|m| format!("#{}", m.get())).collect();
        format!("[{}]", members.join(" "))
    }

    fn named(ast: &Ast, node: NodeRef) -> String {
        match ast.name_of(node) {
            Some(name) => format!("{}#{}", name, node.get()),
            None => format!("#{}", node.get()),
        }
    }
}
