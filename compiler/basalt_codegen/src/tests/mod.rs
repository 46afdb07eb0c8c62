//! Lowering tests over whole programs.
//!
//! Programs are assembled directly as type-checked trees in a
//! [`ProgramRegistry`], lowered through the [`Finalizer`](crate::Finalizer)
//! and, where behavior matters, JIT compiled and executed.

mod operator_tests;
mod statement_tests;

pub mod helper {
    use basalt_ir::{
        Argument, DebugInfo, FunctionDefinition, FunctionRef, ProgramRegistry,
        ProgramRepresentation, Statement,
        StructDefinition, StructField, TypeAlias, TypeDefinition, TypeSignature, UnionDefinition,
    };
    use inkwell::context::Context;
    use inkwell::execution_engine::ExecutionEngine;
    use inkwell::module::Module;
    use inkwell::values::{AnyValue, FunctionValue, InstructionOpcode};
    use inkwell::OptimizationLevel;

    use crate::context::SimpleCx;
    use crate::{CodegenConfig, CodegenCx, FinalizeError, Finalizer, TargetConfig};

    pub const FILE: &str = "main.bt";
    pub const PACKAGE: &str = "main";
    pub const TRIPLE: &str = "x86_64-unknown-linux-gnu";

    pub fn at(line: u32) -> DebugInfo {
        DebugInfo::new(FILE, line, 1)
    }

    /// Host target, so lowered modules can be JIT executed.
    pub fn config() -> CodegenConfig {
        let target = TargetConfig::native()
            .or_else(|_| TargetConfig::from_triple(TRIPLE))
            .expect("test triple is supported");
        CodegenConfig::new("test", target)
    }

    /// A registry plus the bookkeeping that keeps test declarations unique.
    pub struct TestProgram {
        pub registry: ProgramRegistry,
        next_function_line: u32,
    }

    impl Default for TestProgram {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestProgram {
        pub fn new() -> Self {
            crate::init_tracing();
            Self {
                registry: ProgramRegistry::new(),
                next_function_line: 1000,
            }
        }

        pub fn define_struct(&mut self, name: &str, fields: &[(&str, TypeSignature)]) -> TypeSignature {
            let definition = StructDefinition {
                package: PACKAGE.to_owned(),
                name: name.to_owned(),
                fields: fields
                    .iter()
                    .map(|(field, ty)| StructField::new(*field, ty.clone()))
                    .collect(),
                debug: at(1),
            };
            self.registry
                .store_type_definition(TypeDefinition::Struct(definition))
                .expect("struct is new");
            TypeSignature::custom(PACKAGE, name)
        }

        pub fn define_union(&mut self, name: &str, alternatives: &[TypeSignature]) -> TypeSignature {
            let definition = UnionDefinition {
                package: PACKAGE.to_owned(),
                name: name.to_owned(),
                alternatives: alternatives.to_vec(),
                debug: at(1),
            };
            self.registry
                .store_type_definition(TypeDefinition::Union(definition))
                .expect("union is new");
            TypeSignature::custom(PACKAGE, name)
        }

        pub fn define_alias(&mut self, name: &str, aliased: TypeSignature) -> TypeSignature {
            let definition = TypeAlias {
                package: PACKAGE.to_owned(),
                name: name.to_owned(),
                aliased,
                debug: at(1),
            };
            self.registry
                .store_type_definition(TypeDefinition::Alias(definition))
                .expect("alias is new");
            TypeSignature::custom(PACKAGE, name)
        }

        /// Register a function. Each one gets its own declaration line, so
        /// overloads never collide.
        pub fn function(
            &mut self,
            name: &str,
            arguments: &[(&str, TypeSignature)],
            return_type: Option<TypeSignature>,
            code: Vec<Statement>,
        ) -> FunctionRef {
            self.generic_function(name, &[], arguments, return_type, code)
        }

        pub fn generic_function(
            &mut self,
            name: &str,
            template_generics: &[&str],
            arguments: &[(&str, TypeSignature)],
            return_type: Option<TypeSignature>,
            code: Vec<Statement>,
        ) -> FunctionRef {
            let line = self.next_function_line;
            self.next_function_line += 1;
            let definition = FunctionDefinition {
                name: name.to_owned(),
                package: PACKAGE.to_owned(),
                template_generics: template_generics.iter().map(|g| (*g).to_owned()).collect(),
                arguments: arguments
                    .iter()
                    .map(|(argument, ty)| Argument::new(*argument, ty.clone()))
                    .collect(),
                return_type,
                code,
                debug: at(line),
            };
            self.registry
                .store_function_definition(definition)
                .expect("function is new")
        }

        pub fn try_lower<'ctx>(&self, context: &'ctx Context) -> Result<Module<'ctx>, FinalizeError> {
            Finalizer::new(&self.registry, config()).lower_module(context)
        }

        pub fn lower<'ctx>(&self, context: &'ctx Context) -> Module<'ctx> {
            match self.try_lower(context) {
                Ok(module) => module,
                Err(err) => panic!("lowering failed: {err}"),
            }
        }

        pub fn run_int(&self, prefix: &str) -> i64 {
            let context = Context::create();
            let module = self.lower(&context);
            Executable::new(&module).int(prefix)
        }

        pub fn run_float(&self, prefix: &str) -> f64 {
            let context = Context::create();
            let module = self.lower(&context);
            Executable::new(&module).float(prefix)
        }

        pub fn run_char(&self, prefix: &str) -> u8 {
            let context = Context::create();
            let module = self.lower(&context);
            Executable::new(&module).char(prefix)
        }

        pub fn run_bool(&self, prefix: &str) -> bool {
            let context = Context::create();
            let module = self.lower(&context);
            Executable::new(&module).bool(prefix)
        }
    }

    /// Run `f` on a fresh lowering session over `program`.
    pub fn with_codegen_cx<R>(
        program: &dyn ProgramRepresentation,
        f: impl FnOnce(&mut CodegenCx<'_, '_>) -> R,
    ) -> R {
        let context = Context::create();
        let scx = SimpleCx::new(&context, "test");
        let mut cx = CodegenCx::new(program, &scx);
        f(&mut cx)
    }

    /// The emitted function for the source function (or dispatcher) whose
    /// unique name starts with `prefix`.
    pub fn function_named<'ctx>(module: &Module<'ctx>, prefix: &str) -> FunctionValue<'ctx> {
        let matches: Vec<FunctionValue<'ctx>> = module
            .get_functions()
            .filter(|func| func.get_name().to_string_lossy().starts_with(prefix))
            .collect();
        assert_eq!(matches.len(), 1, "expected exactly one function starting with '{prefix}'");
        matches[0]
    }

    /// Functions whose name starts with `prefix`.
    pub fn functions_starting_with(module: &Module<'_>, prefix: &str) -> usize {
        module
            .get_functions()
            .filter(|func| func.get_name().to_string_lossy().starts_with(prefix))
            .count()
    }

    /// Instructions with `opcode` in the function named by `prefix`.
    pub fn count(module: &Module<'_>, prefix: &str, opcode: InstructionOpcode) -> usize {
        let mut found = 0;
        for block in function_named(module, prefix).get_basic_blocks() {
            let mut instr = block.get_first_instruction();
            while let Some(current) = instr {
                if current.get_opcode() == opcode {
                    found += 1;
                }
                instr = current.get_next_instruction();
            }
        }
        found
    }

    pub fn block_labels(module: &Module<'_>, prefix: &str) -> Vec<String> {
        function_named(module, prefix)
            .get_basic_blocks()
            .iter()
            .map(|block| block.get_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Textual IR of one function.
    pub fn function_ir(module: &Module<'_>, prefix: &str) -> String {
        function_named(module, prefix).print_to_string().to_string()
    }

    /// A JIT compiled module.
    ///
    /// The engine takes the module over, so inspect the IR before building
    /// one, and build at most one per module.
    pub struct Executable<'m, 'ctx> {
        module: &'m Module<'ctx>,
        engine: ExecutionEngine<'ctx>,
    }

    #[allow(unsafe_code, reason = "JIT compiled functions are called through raw pointers")]
    impl<'m, 'ctx> Executable<'m, 'ctx> {
        pub fn new(module: &'m Module<'ctx>) -> Self {
            let engine = module
                .create_jit_execution_engine(OptimizationLevel::None)
                .unwrap_or_else(|err| panic!("JIT unavailable: {err}"));
            Self { module, engine }
        }

        pub fn engine(&self) -> &ExecutionEngine<'ctx> {
            &self.engine
        }

        /// Full symbol name of the function named by `prefix`.
        pub fn symbol(&self, prefix: &str) -> String {
            function_named(self.module, prefix)
                .get_name()
                .to_string_lossy()
                .into_owned()
        }

        pub fn int(&self, prefix: &str) -> i64 {
            let name = self.symbol(prefix);
            unsafe {
                let func = self
                    .engine
                    .get_function::<unsafe extern "C" fn() -> i64>(&name)
                    .unwrap_or_else(|err| panic!("'{name}' not found: {err}"));
                func.call()
            }
        }

        pub fn float(&self, prefix: &str) -> f64 {
            let name = self.symbol(prefix);
            unsafe {
                let func = self
                    .engine
                    .get_function::<unsafe extern "C" fn() -> f64>(&name)
                    .unwrap_or_else(|err| panic!("'{name}' not found: {err}"));
                func.call()
            }
        }

        pub fn char(&self, prefix: &str) -> u8 {
            let name = self.symbol(prefix);
            unsafe {
                let func = self
                    .engine
                    .get_function::<unsafe extern "C" fn() -> u8>(&name)
                    .unwrap_or_else(|err| panic!("'{name}' not found: {err}"));
                func.call()
            }
        }

        /// `i1` results come back in a byte whose upper bits are unspecified.
        pub fn bool(&self, prefix: &str) -> bool {
            let name = self.symbol(prefix);
            let raw = unsafe {
                let func = self
                    .engine
                    .get_function::<unsafe extern "C" fn() -> u8>(&name)
                    .unwrap_or_else(|err| panic!("'{name}' not found: {err}"));
                func.call()
            };
            raw & 1 == 1
        }

        pub fn void(&self, prefix: &str) {
            let name = self.symbol(prefix);
            unsafe {
                let func = self
                    .engine
                    .get_function::<unsafe extern "C" fn()>(&name)
                    .unwrap_or_else(|err| panic!("'{name}' not found: {err}"));
                func.call();
            }
        }
    }
}
